//! Narrative session log
//!
//! One markdown file per analysis; follow-up exchanges are appended in order.
//! Each session owns its file, so concurrent sessions never share state.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::prompt::{percent, ChatContext};
use crate::error::Result;
use crate::logic::model::PredictionResult;

const CHAT_HEADING: &str = "## Follow-up Chat";

#[derive(Debug)]
pub struct NarrativeSession {
    path: PathBuf,
    context: ChatContext,
    /// Exchanges written so far; also serializes writers
    exchanges: Mutex<usize>,
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

/// First free `{stem}.md`, `{stem}_2.md`, ... in `dir`
fn create_unique(dir: &Path, stem: &str) -> io::Result<(PathBuf, File)> {
    let mut attempt = 1;
    loop {
        let file_name = if attempt == 1 {
            format!("{}.md", stem)
        } else {
            format!("{}_{}.md", stem, attempt)
        };
        let path = dir.join(file_name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

impl NarrativeSession {
    /// Write the report header and analysis to a new file in `dir`
    pub fn create(dir: impl AsRef<Path>, result: &PredictionResult, analysis: &str) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let now = Local::now();
        let stem = format!(
            "employee_analysis_{}_{}",
            sanitize(&result.employee_name),
            now.format("%Y%m%d_%H%M%S")
        );
        let (path, mut file) = create_unique(dir, &stem)?;

        write!(
            file,
            "# Employee Attrition Analysis Report\n\n\
             **Employee:** {}  \n\
             **Analysis Date:** {}  \n\
             **Attrition Probability:** {}  \n\
             **Risk Level:** {}  \n\n\
             ---\n\n\
             {}\n\n\
             ---\n\n\
             *Generated by Employee Attrition Analysis System*\n",
            result.employee_name,
            now.format("%Y-%m-%d %H:%M:%S"),
            percent(result.attrition_probability),
            result.risk_level,
            analysis.trim_end()
        )?;
        file.flush()?;

        log::info!("Analysis saved to {}", path.display());

        Ok(Self {
            path,
            context: ChatContext::from(result),
            exchanges: Mutex::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context(&self) -> &ChatContext {
        &self.context
    }

    pub fn exchange_count(&self) -> usize {
        *self.exchanges.lock()
    }

    /// Append one question/response pair under the follow-up heading
    pub fn append_exchange(&self, question: &str, response: &str) -> Result<()> {
        let mut count = self.exchanges.lock();

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        if *count == 0 {
            write!(file, "\n\n{}\n", CHAT_HEADING)?;
        }
        write!(
            file,
            "\n### Question ({})\n{}\n\n### Response\n{}\n\n---\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            question.trim(),
            response.trim_end()
        )?;
        file.flush()?;

        *count += 1;
        log::debug!("Chat exchange {} logged to {}", *count, self.path.display());
        Ok(())
    }
}
