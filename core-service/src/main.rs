//! Attrition CLI - interactive prediction and engagement consultation

mod cli;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use attrition_core::constants;
use attrition_core::logic::model::PredictionResult;
use attrition_core::logic::narrative::{
    conversation_starters, ChatContext, EngagementAnalyzer, GeminiClient,
};
use attrition_core::{AttritionPredictor, PredictorConfig};

use cli::display;
use cli::input::{ChatInput, DataSource, Prompter};

#[derive(Debug, Parser)]
#[command(name = "attrition-cli", version, about = "Employee attrition prediction and engagement analysis")]
struct Args {
    /// Directory with feature_columns.json, scaler.json and the classifier
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Pre-encoded test data CSV
    #[arg(long)]
    test_data: Option<PathBuf>,

    /// Simplified-attribute schema JSON
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Predict this test row directly instead of asking
    #[arg(long)]
    index: Option<usize>,

    /// Skip the LLM narrative and chat
    #[arg(long)]
    no_narrative: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mut config = PredictorConfig::from_env();
    if let Some(dir) = args.artifacts_dir {
        config.artifacts_dir = dir;
    }
    if let Some(path) = args.test_data {
        config.test_data_path = path;
    }
    if let Some(path) = args.schema {
        config.schema_path = path;
    }

    let predictor = AttritionPredictor::load(&config).with_context(|| {
        format!(
            "System initialization failed (artifacts in {})",
            config.artifacts_dir.display()
        )
    })?;

    let analyzer = if args.no_narrative {
        None
    } else {
        match GeminiClient::from_env() {
            Some(client) => Some(EngagementAnalyzer::new(
                Arc::new(client),
                constants::get_outputs_dir(),
            )),
            None => {
                log::warn!("GOOGLE_API_KEY not set; narrative analysis disabled");
                None
            }
        }
    };

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    display::banner(prompter.writer(), predictor.service().artifacts().metadata())?;

    let result = match args.index {
        Some(index) => predictor.predict_from_test_data(index)?,
        None => predict_interactively(&predictor, &mut prompter)?,
    };

    display::prediction(prompter.writer(), &result)?;

    match &analyzer {
        Some(analyzer) => consult(analyzer, &result, &mut prompter)?,
        None if !args.no_narrative => {
            display::narrative_unavailable(prompter.writer(), "GOOGLE_API_KEY is not configured")?
        }
        None => {}
    }

    prompter.writer().flush()?;
    Ok(())
}

fn predict_interactively<R: io::BufRead, W: Write>(
    predictor: &AttritionPredictor,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<PredictionResult> {
    match prompter.choose_source()? {
        DataSource::TestData => {
            let info = predictor.test_data_info();
            if info.total_employees == 0 {
                bail!("The test dataset is empty");
            }
            let index = prompter.choose_index(&info, predictor.random_test_index())?;
            writeln!(prompter.writer(), "Analyzing Employee #{} from test data", index)?;
            Ok(predictor.predict_from_test_data(index)?)
        }
        DataSource::Custom => {
            let profile = prompter.read_profile(predictor.schema(), predictor.policy())?;
            Ok(predictor.predict_profile(&profile)?)
        }
    }
}

fn consult<R: io::BufRead, W: Write>(
    analyzer: &EngagementAnalyzer,
    result: &PredictionResult,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let analysis = match analyzer.analyze(result) {
        Ok(analysis) => analysis,
        Err(e) => {
            display::narrative_unavailable(prompter.writer(), &e.to_string())?;
            return Ok(());
        }
    };
    display::analysis(prompter.writer(), &analysis)?;

    let starters = conversation_starters(result.attrition_probability);
    display::suggestions(prompter.writer(), starters)?;

    let session = analysis.session.as_deref();
    let context = ChatContext::from(result);
    loop {
        match prompter.read_chat(starters)? {
            ChatInput::Quit => {
                writeln!(
                    prompter.writer(),
                    "\nSession ended. Check the {} folder for saved analysis!",
                    analyzer.outputs_dir().display()
                )?;
                return Ok(());
            }
            ChatInput::Question(question) => {
                match analyzer.chat(&question, Some(&context), session) {
                    Ok(response) => display::chat_response(prompter.writer(), &response)?,
                    Err(e) => writeln!(prompter.writer(), "Chat failed: {}", e)?,
                }
            }
        }
    }
}
