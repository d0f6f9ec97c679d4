//! Line-based prompts over any reader/writer pair
//!
//! Invalid answers re-prompt with the validation message; end of input is an
//! error so a closed stdin never spins.

use std::io::{self, BufRead, Write};

use attrition_core::error::AttritionError;
use attrition_core::logic::dataset::TestDataInfo;
use attrition_core::logic::features::{
    AttributeKind, AttributeSpec, AttributeValue, CategoricalPolicy, EmployeeProfile,
    SimplifiedSchema,
};

/// Words that end the follow-up chat
pub const EXIT_WORDS: &[&str] = &["quit", "exit", "bye", "q"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    TestData,
    Custom,
}

/// One chat-loop answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Question(String),
    Quit,
}

pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Print `prompt` and read one trimmed line
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    pub fn choose_source(&mut self) -> io::Result<DataSource> {
        writeln!(self.writer, "\n=== EMPLOYEE ATTRITION PREDICTION ===")?;
        writeln!(self.writer, "1. Use test data (demo)")?;
        writeln!(self.writer, "2. Enter custom employee data")?;
        loop {
            match self.ask("Select option (1 or 2): ")?.as_str() {
                "1" => return Ok(DataSource::TestData),
                "2" => return Ok(DataSource::Custom),
                _ => writeln!(self.writer, "Please select 1 or 2")?,
            }
        }
    }

    /// Index within the dataset bounds; empty input picks `random`
    pub fn choose_index(&mut self, info: &TestDataInfo, random: Option<usize>) -> io::Result<usize> {
        let Some(max) = info.max_index else {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "test dataset is empty"));
        };
        let prompt = format!(
            "Employee index ({}, Enter for random): ",
            info.available_indices
        );
        loop {
            let answer = self.ask(&prompt)?;
            if answer.is_empty() {
                if let Some(index) = random {
                    writeln!(self.writer, "Randomly selected employee index: {}", index)?;
                    return Ok(index);
                }
            }
            match answer.parse::<usize>() {
                Ok(index) if index <= max => return Ok(index),
                Ok(index) => writeln!(
                    self.writer,
                    "{}",
                    AttritionError::not_found(index, info.total_employees)
                )?,
                Err(_) => writeln!(self.writer, "Please enter a valid number")?,
            }
        }
    }

    /// Ask every schema question, re-prompting on invalid answers
    pub fn read_profile(
        &mut self,
        schema: &SimplifiedSchema,
        policy: CategoricalPolicy,
    ) -> io::Result<EmployeeProfile> {
        let mut profile = EmployeeProfile::default();

        for field in &schema.employee_info {
            let answer = self.ask(&format!("{}: ", field.question))?;
            if !answer.is_empty() {
                profile.insert(field.key.clone(), answer);
            }
        }

        for spec in &schema.features {
            if let Some(value) = self.read_attribute(spec, policy)? {
                profile.insert(spec.key.clone(), value);
            }
        }
        Ok(profile)
    }

    fn read_attribute(
        &mut self,
        spec: &AttributeSpec,
        policy: CategoricalPolicy,
    ) -> io::Result<Option<AttributeValue>> {
        let prompt = match &spec.kind {
            AttributeKind::Number { min, max } => {
                let range = match (min, max) {
                    (Some(lo), Some(hi)) => format!(" [{}-{}]", lo, hi),
                    (Some(lo), None) => format!(" [>= {}]", lo),
                    (None, Some(hi)) => format!(" [<= {}]", hi),
                    (None, None) => String::new(),
                };
                format!("{}{}: ", spec.question, range)
            }
            AttributeKind::Choice { options } | AttributeKind::ChoiceWithOther { options } => {
                writeln!(self.writer, "\n{}:", spec.question)?;
                for (i, option) in options.iter().enumerate() {
                    writeln!(self.writer, "  {}. {}", i + 1, option)?;
                }
                if matches!(spec.kind, AttributeKind::ChoiceWithOther { .. })
                    && policy == CategoricalPolicy::AllowOther
                {
                    writeln!(self.writer, "  (or type your own)")?;
                }
                "Choice: ".to_string()
            }
        };
        let prompt = if spec.optional {
            format!("{}(optional, Enter to skip) ", prompt)
        } else {
            prompt
        };

        loop {
            let answer = self.ask(&prompt)?;
            if answer.is_empty() {
                if spec.optional {
                    return Ok(None);
                }
                writeln!(self.writer, "A value is required")?;
                continue;
            }

            let literal = spec.options().iter().any(|o| o.eq_ignore_ascii_case(&answer));
            let raw = match answer.parse::<usize>() {
                Ok(n) if !spec.is_numeric() && !literal => match spec.option_by_number(n) {
                    Some(option) => AttributeValue::from(option),
                    None => {
                        writeln!(
                            self.writer,
                            "Please pick a number between 1 and {}",
                            spec.options().len()
                        )?;
                        continue;
                    }
                },
                _ => AttributeValue::from(answer.as_str()),
            };

            match spec.parse_value(&raw, policy) {
                Ok(value) => return Ok(Some(value)),
                Err(AttritionError::Validation { message, .. }) => {
                    writeln!(self.writer, "{}", message)?
                }
                Err(e) => writeln!(self.writer, "{}", e)?,
            }
        }
    }

    /// Next chat question. A number picks a suggested question.
    pub fn read_chat(&mut self, suggestions: &[&str]) -> io::Result<ChatInput> {
        loop {
            let answer = match self.ask("\n> Your question: ") {
                Ok(answer) => answer,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(ChatInput::Quit),
                Err(e) => return Err(e),
            };
            if EXIT_WORDS.contains(&answer.to_lowercase().as_str()) {
                return Ok(ChatInput::Quit);
            }
            if answer.is_empty() {
                writeln!(self.writer, "Please enter a question or type 'quit' to exit")?;
                continue;
            }
            if let Ok(n) = answer.parse::<usize>() {
                if let Some(question) = n.checked_sub(1).and_then(|i| suggestions.get(i)) {
                    return Ok(ChatInput::Question(question.to_string()));
                }
            }
            return Ok(ChatInput::Question(answer));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.writer.clone()).unwrap()
    }

    #[test]
    fn test_choose_source_reprompts() {
        let mut p = prompter("3\nx\n2\n");
        assert_eq!(p.choose_source().unwrap(), DataSource::Custom);
        assert_eq!(output(&p).matches("Please select 1 or 2").count(), 2);
    }

    #[test]
    fn test_choose_index() {
        let info = TestDataInfo {
            total_employees: 10,
            available_indices: "0 to 9".into(),
            max_index: Some(9),
        };
        let mut p = prompter("10\nabc\n4\n");
        assert_eq!(p.choose_index(&info, Some(2)).unwrap(), 4);
        assert!(output(&p).contains("Employee index 10 not found. Max index: 9"));

        let mut p = prompter("\n");
        assert_eq!(p.choose_index(&info, Some(7)).unwrap(), 7);
    }

    #[test]
    fn test_read_profile_reprompts_on_validation() {
        let schema = SimplifiedSchema::builtin();
        // name, then Age out of range, then valid answers in schema order
        let mut answers = vec!["Ana".to_string(), "17".to_string(), "30".to_string()];
        for spec in schema.features.iter().skip(1) {
            if spec.optional {
                answers.push(String::new());
            } else if let AttributeKind::Number { min, .. } = &spec.kind {
                answers.push(min.unwrap_or(0.0).to_string());
            } else {
                answers.push("1".to_string());
            }
        }
        let mut p = prompter(&(answers.join("\n") + "\n"));
        let profile = p.read_profile(&schema, CategoricalPolicy::AllowOther).unwrap();

        assert_eq!(profile.display_name(), "Ana");
        assert_eq!(profile.get("Age"), Some(&AttributeValue::Number(30.0)));
        assert_eq!(profile.get("OverTime"), Some(&AttributeValue::Text("Yes".into())));
        assert!(profile.get("YearsInCurrentRole").is_none());
        assert!(output(&p).contains("Value must be >= 18"));
        assert!(schema.parse_input(&profile, CategoricalPolicy::AllowOther).is_ok());
    }

    #[test]
    fn test_free_text_choice() {
        let schema = SimplifiedSchema::builtin();
        let spec = schema.attribute("EducationField").unwrap();
        let mut p = prompter("Marine Biology\n");
        let value = p.read_attribute(spec, CategoricalPolicy::AllowOther).unwrap();
        assert_eq!(value, Some(AttributeValue::Text("Marine Biology".into())));

        let mut p = prompter("Marine Biology\n2\n");
        let value = p.read_attribute(spec, CategoricalPolicy::Strict).unwrap();
        assert_eq!(value, Some(AttributeValue::Text("Medical".into())));
    }

    #[test]
    fn test_unknown_option_number_reprompts() {
        let schema = SimplifiedSchema::builtin();
        let spec = schema.attribute("EducationField").unwrap();
        let mut p = prompter("9\n0\n3\n");
        let value = p.read_attribute(spec, CategoricalPolicy::AllowOther).unwrap();
        assert_eq!(value, Some(AttributeValue::Text("Marketing".into())));
        assert_eq!(output(&p).matches("Please pick a number between 1 and 6").count(), 2);
    }

    #[test]
    fn test_read_chat() {
        let suggestions = ["First?", "Second?"];
        let mut p = prompter("\n2\nwhy?\nBYE\n");
        assert_eq!(
            p.read_chat(&suggestions).unwrap(),
            ChatInput::Question("Second?".into())
        );
        assert_eq!(
            p.read_chat(&suggestions).unwrap(),
            ChatInput::Question("why?".into())
        );
        assert_eq!(p.read_chat(&suggestions).unwrap(), ChatInput::Quit);
        assert_eq!(p.read_chat(&suggestions).unwrap(), ChatInput::Quit);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut p = prompter("");
        assert!(p.choose_source().is_err());
    }
}
