//! Command parsing and handlers.
//!
//! # Invariants
//! - Arguments are fully parsed into a [`Command`] before storage is opened.
//! - Handlers print plain text to stdout; failures bubble up as messages.

use crate::args::{parse_subject, ArgParser};
use crate::config::CliConfig;
use crate::gemini::GeminiClient;
use std::error::Error;
use std::io::Read;
use studynotes_core::{
    search_notes, BlockNumber, GenerationError, GenerationRequest, KeyValueRepository,
    NoteService, NotesSearchQuery, ProgressStore, Segmentation, Subject, BLOCKS_PER_SUBJECT,
};

pub type CommandResult = Result<(), Box<dyn Error>>;

/// One parsed storage-backed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Subjects,
    Show {
        subject: Subject,
        block: BlockNumber,
    },
    Edit {
        subject: Subject,
        block: BlockNumber,
        source: String,
    },
    Import {
        subject: Subject,
        source: String,
    },
    Format {
        subject: Subject,
        block: BlockNumber,
        source: String,
    },
    Enhance {
        subject: Subject,
        block: BlockNumber,
    },
    Ask {
        subject: Subject,
        question: String,
    },
    Search(NotesSearchQuery),
    Progress {
        toggle: Option<(Subject, BlockNumber)>,
    },
}

impl Command {
    /// Parses `name` and its arguments; `Ok(None)` for unknown names.
    pub fn parse(name: &str, args: Vec<String>) -> Result<Option<Self>, Box<dyn Error>> {
        let mut args = ArgParser::new(args, name);
        let command = match name {
            "subjects" => Self::Subjects,
            "show" => Self::Show {
                subject: args.subject()?,
                block: args.block()?,
            },
            "edit" => Self::Edit {
                subject: args.subject()?,
                block: args.block()?,
                source: args.required("a file path or `-` for stdin")?,
            },
            "import" => Self::Import {
                subject: args.subject()?,
                source: args.required("a curriculum file path or `-` for stdin")?,
            },
            "format" => Self::Format {
                subject: args.subject()?,
                block: args.block()?,
                source: args.required("a file path or `-` for stdin")?,
            },
            "enhance" => Self::Enhance {
                subject: args.subject()?,
                block: args.block()?,
            },
            "ask" => {
                let subject = args.subject()?;
                let question = args.collect_remaining().join(" ");
                if question.trim().is_empty() {
                    return Err("Provide a question for ask".into());
                }
                return Ok(Some(Self::Ask { subject, question }));
            }
            "search" => Self::Search(parse_search(&mut args)?),
            "progress" => match args.next().as_deref() {
                None => Self::Progress { toggle: None },
                Some("toggle") => Self::Progress {
                    toggle: Some((args.subject()?, args.block()?)),
                },
                Some(other) => return Err(format!("Unknown progress action `{other}`").into()),
            },
            _ => return Ok(None),
        };
        args.finish()?;
        Ok(Some(command))
    }

    pub fn execute<R: KeyValueRepository>(self, repo: &R, config: &CliConfig) -> CommandResult {
        match self {
            Self::Subjects => list_subjects(repo),
            Self::Show { subject, block } => show(repo, subject, block),
            Self::Edit {
                subject,
                block,
                source,
            } => edit(repo, subject, block, &source),
            Self::Import { subject, source } => import(repo, config, subject, &source),
            Self::Format {
                subject,
                block,
                source,
            } => {
                let client = generation_client(config)?;
                let text = non_blank_source(&source)?;
                format_block(repo, &client, subject, block, text)
            }
            Self::Enhance { subject, block } => enhance(repo, config, subject, block),
            Self::Ask { subject, question } => ask(repo, config, subject, &question),
            Self::Search(query) => search(repo, &query),
            Self::Progress { toggle } => progress(repo, toggle),
        }
    }
}

fn parse_search(args: &mut ArgParser) -> Result<NotesSearchQuery, Box<dyn Error>> {
    let mut subject = None;
    let mut limit = None;
    let mut words = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-s" | "--subject" => subject = Some(parse_subject(&args.flag_value(&arg)?)?),
            "-n" | "--limit" => {
                let raw = args.flag_value(&arg)?;
                limit = Some(
                    raw.parse::<u32>()
                        .map_err(|_| format!("Invalid limit `{raw}`"))?,
                );
            }
            _ => words.push(arg),
        }
    }
    if words.is_empty() {
        return Err("Provide a search query".into());
    }

    let mut query = NotesSearchQuery::new(words.join(" "));
    query.subject = subject;
    if let Some(limit) = limit {
        query.limit = limit;
    }
    Ok(query)
}

fn list_subjects<R: KeyValueRepository>(repo: &R) -> CommandResult {
    let service = NoteService::open(repo);
    let progress = ProgressStore::new(repo).load();

    for subject in Subject::ALL {
        println!(
            "{:<10} {:<10} notes {}/{BLOCKS_PER_SUBJECT}  done {}/{BLOCKS_PER_SUBJECT}",
            subject.as_str(),
            subject.display_name(),
            service.notes().subject(subject).len(),
            progress.completed_blocks(subject).len(),
        );
    }
    Ok(())
}

fn show<R: KeyValueRepository>(repo: &R, subject: Subject, block: BlockNumber) -> CommandResult {
    let service = NoteService::open(repo);
    match service.block(subject, block) {
        Some(content) => println!("{content}"),
        None => println!("No notes yet for {} Block {block}.", subject.display_name()),
    }
    Ok(())
}

fn edit<R: KeyValueRepository>(
    repo: &R,
    subject: Subject,
    block: BlockNumber,
    source: &str,
) -> CommandResult {
    let content = read_source(source)?;
    let mut service = NoteService::open(repo);
    service.save_block(subject.as_str(), block, content.as_str());
    println!(
        "Saved {} Block {block} ({} bytes).",
        subject.display_name(),
        content.len()
    );
    Ok(())
}

fn import<R: KeyValueRepository>(
    repo: &R,
    config: &CliConfig,
    subject: Subject,
    source: &str,
) -> CommandResult {
    let client = generation_client(config)?;
    let text = non_blank_source(source)?;
    let request = GenerationRequest::full_curriculum(subject, text);
    let mut service = NoteService::open(repo);
    let segmentation = service
        .generate(&client, &request)
        .map_err(generation_failure)?;

    print_segmentation(subject, &segmentation);
    Ok(())
}

fn enhance<R: KeyValueRepository>(
    repo: &R,
    config: &CliConfig,
    subject: Subject,
    block: BlockNumber,
) -> CommandResult {
    let client = generation_client(config)?;
    let existing = NoteService::open(repo)
        .block(subject, block)
        .filter(|content| !content.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            format!(
                "No notes to enhance for {} Block {block}.",
                subject.display_name()
            )
        })?;
    format_block(repo, &client, subject, block, existing)
}

fn ask<R: KeyValueRepository>(
    repo: &R,
    config: &CliConfig,
    subject: Subject,
    question: &str,
) -> CommandResult {
    let client = generation_client(config)?;
    let answer = NoteService::open(repo)
        .ask(&client, subject, question)
        .map_err(generation_failure)?;
    println!("{answer}");
    Ok(())
}

fn search<R: KeyValueRepository>(repo: &R, query: &NotesSearchQuery) -> CommandResult {
    let service = NoteService::open(repo);
    let hits = search_notes(service.notes(), query);
    if hits.is_empty() {
        println!("No matches.");
    }
    for hit in hits {
        println!("{} {}: {}", hit.subject, hit.block, hit.snippet);
    }
    Ok(())
}

fn progress<R: KeyValueRepository>(
    repo: &R,
    toggle: Option<(Subject, BlockNumber)>,
) -> CommandResult {
    let store = ProgressStore::new(repo);
    let mut progress = store.load();

    if let Some((subject, block)) = toggle {
        let completed = progress.toggle(subject, block);
        store.save(&progress);
        println!(
            "{} Block {block}: {}",
            subject.display_name(),
            if completed { "completed" } else { "not completed" }
        );
    }

    println!(
        "Overall: {}% ({} of {} blocks)",
        progress.percent_complete(),
        progress.completed_count(),
        Subject::ALL.len() * usize::from(BLOCKS_PER_SUBJECT)
    );
    for subject in Subject::ALL {
        let done = progress.completed_blocks(subject);
        if !done.is_empty() {
            let blocks = done
                .iter()
                .map(BlockNumber::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {}: {blocks}", subject.display_name());
        }
    }
    Ok(())
}

fn format_block<R: KeyValueRepository>(
    repo: &R,
    client: &GeminiClient,
    subject: Subject,
    block: BlockNumber,
    text: String,
) -> CommandResult {
    let request = GenerationRequest::single_block(subject, block, text);
    let mut service = NoteService::open(repo);
    let segmentation = service
        .generate(client, &request)
        .map_err(generation_failure)?;
    print_segmentation(subject, &segmentation);
    Ok(())
}

fn print_segmentation(subject: Subject, segmentation: &Segmentation) {
    println!(
        "Updated {} ({})",
        subject.display_name(),
        segmentation.strategy.as_str()
    );
    for (block, content) in &segmentation.blocks {
        println!("  Block {block}: {} bytes", content.len());
    }
}

fn generation_client(config: &CliConfig) -> Result<GeminiClient, Box<dyn Error>> {
    GeminiClient::new(config.generation.clone()).map_err(generation_failure)
}

fn generation_failure(err: GenerationError) -> Box<dyn Error> {
    format!("{} ({err})", err.user_message()).into()
}

fn read_source(source: &str) -> Result<String, Box<dyn Error>> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(source).map_err(|err| format!("Cannot read `{source}`: {err}").into())
}

fn non_blank_source(source: &str) -> Result<String, Box<dyn Error>> {
    let text = read_source(source)?;
    if text.trim().is_empty() {
        return Err(format!("Source `{source}` is empty").into());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::Command;
    use studynotes_core::{BlockNumber, Subject};

    fn parse(name: &str, args: &[&str]) -> Result<Option<Command>, String> {
        Command::parse(name, args.iter().map(|arg| arg.to_string()).collect())
            .map_err(|err| err.to_string())
    }

    #[test]
    fn parses_block_commands() {
        assert_eq!(
            parse("show", &["ICT", "2"]).unwrap(),
            Some(Command::Show {
                subject: Subject::Ict,
                block: BlockNumber::new(2).unwrap(),
            })
        );
        assert_eq!(
            parse("progress", &["toggle", "maths", "6"]).unwrap(),
            Some(Command::Progress {
                toggle: Some((Subject::Maths, BlockNumber::new(6).unwrap())),
            })
        );
    }

    #[test]
    fn parses_search_flags_and_question_words() {
        match parse("search", &["-s", "physics", "-n", "3", "ohm", "law"]).unwrap() {
            Some(Command::Search(query)) => {
                assert_eq!(query.text, "ohm law");
                assert_eq!(query.subject, Some(Subject::Physics));
                assert_eq!(query.limit, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(
            parse("ask", &["english", "what", "is", "a", "sonnet?"]).unwrap(),
            Some(Command::Ask {
                subject: Subject::English,
                question: "what is a sonnet?".to_string(),
            })
        );
    }

    #[test]
    fn rejects_bad_arguments_and_ignores_unknown_names() {
        assert!(parse("show", &["latin", "1"]).unwrap_err().contains("Unknown subject"));
        assert!(parse("edit", &["maths", "0", "f.html"]).unwrap_err().contains("Invalid block"));
        assert!(parse("subjects", &["extra"]).unwrap_err().contains("Unexpected arguments"));
        assert!(parse("ask", &["maths"]).unwrap_err().contains("Provide a question"));
        assert_eq!(parse("frobnicate", &[]).unwrap(), None);
    }
}
