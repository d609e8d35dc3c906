use std::error::Error;
use studynotes_core::{BlockNumber, Subject};

/// Positional argument reader for one command.
pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self {
            iter: args.into_iter(),
            command_name: command_name.to_string(),
        }
    }

    /// Next positional argument, or an error naming what was expected.
    pub fn required(&mut self, what: &str) -> Result<String, Box<dyn Error>> {
        self.iter
            .next()
            .ok_or_else(|| format!("Provide {what} for {}", self.command_name).into())
    }

    pub fn subject(&mut self) -> Result<Subject, Box<dyn Error>> {
        let raw = self.required("a subject")?;
        parse_subject(&raw)
    }

    pub fn block(&mut self) -> Result<BlockNumber, Box<dyn Error>> {
        let raw = self.required("a block number (1-6)")?;
        BlockNumber::parse(&raw).map_err(|err| format!("Invalid block `{raw}`: {err}").into())
    }

    /// Takes the value following a flag.
    pub fn flag_value(&mut self, flag: &str) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {flag} for {}", self.command_name).into()
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }

    /// Fails when arguments are left over.
    pub fn finish(self) -> Result<(), Box<dyn Error>> {
        let rest = self.iter.collect::<Vec<_>>();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "Unexpected arguments for {}: {}",
                self.command_name,
                rest.join(" ")
            )
            .into())
        }
    }

    pub fn collect_remaining(self) -> Vec<String> {
        self.iter.collect()
    }
}

pub fn parse_subject(raw: &str) -> Result<Subject, Box<dyn Error>> {
    Subject::parse(raw).ok_or_else(|| {
        let known = Subject::ALL.map(Subject::as_str).join(", ");
        format!("Unknown subject `{raw}`. Expected one of: {known}").into()
    })
}

#[cfg(test)]
mod tests {
    use super::ArgParser;
    use studynotes_core::Subject;

    fn parser(args: &[&str]) -> ArgParser {
        ArgParser::new(args.iter().map(|arg| arg.to_string()).collect(), "show")
    }

    #[test]
    fn reads_subject_and_block() {
        let mut args = parser(&["Chemistry", "3"]);
        assert_eq!(args.subject().unwrap(), Subject::Chemistry);
        assert_eq!(args.block().unwrap().get(), 3);
        assert!(args.finish().is_ok());
    }

    #[test]
    fn reports_unknown_subject_and_bad_block() {
        let err = parser(&["latin"]).subject().unwrap_err();
        assert!(err.to_string().contains("Unknown subject `latin`"));

        let err = parser(&["9"]).block().unwrap_err();
        assert!(err.to_string().contains("Invalid block `9`"));

        let err = parser(&[]).subject().unwrap_err();
        assert!(err.to_string().contains("Provide a subject for show"));
    }

    #[test]
    fn leftover_arguments_are_rejected() {
        let mut args = parser(&["maths", "1", "extra"]);
        args.subject().unwrap();
        args.block().unwrap();
        assert!(args.finish().is_err());
    }
}
