use anyhow::Result;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::{
    llm::{GenerationOutcome, OpenAiBackend, StudySetForm, ensure_client, generate_study_set},
    palette::Palette,
    study::{
        Language, Level,
        request::{DEFAULT_QUESTIONS, QUESTION_COUNT_RANGE},
    },
    tui::run_viewer,
};

/// Form values supplied on the command line. Missing role or topic switches
/// to the interactive form, which asks for every value not given here.
#[derive(Clone, Debug, Default)]
pub struct GenerateArgs {
    pub role: Option<String>,
    pub level: Option<Level>,
    pub topic: Option<String>,
    pub count: Option<u8>,
    pub language: Option<Language>,
    pub markdown: bool,
}

impl GenerateArgs {
    fn is_complete(&self) -> bool {
        self.role.is_some() && self.topic.is_some()
    }

    fn into_form(self) -> StudySetForm {
        StudySetForm {
            role: self.role.unwrap_or_default(),
            level: self.level.unwrap_or_default(),
            topic: self.topic.unwrap_or_default(),
            question_count: self.count.unwrap_or(DEFAULT_QUESTIONS),
            language: self.language.unwrap_or_default(),
        }
    }
}

pub async fn run(args: GenerateArgs) -> Result<()> {
    let client = ensure_client()?;
    let markdown = args.markdown;

    let form = if args.is_complete() {
        args.into_form()
    } else {
        prompt_form(args)?
    };

    println!("{}", Palette::dim("Generating study set..."));
    let outcome = generate_study_set(&OpenAiBackend::new(client), &form).await;

    match outcome {
        GenerationOutcome::Ready(study_set) if !markdown => {
            run_viewer(&viewer_title(&form), &study_set)?;
        }
        other => println!("{}", other.to_markdown()),
    }

    Ok(())
}

fn viewer_title(form: &StudySetForm) -> String {
    format!("{} · {}", form.role.trim(), form.topic.trim())
}

fn prompt_form(args: GenerateArgs) -> Result<StudySetForm> {
    let theme = ColorfulTheme::default();
    println!(
        "{} builds interview questions with hints. Answers stay hidden until you reveal them.\n",
        Palette::paint(Palette::INFO, "studyset")
    );

    let role = match args.role {
        Some(role) => role,
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Role / Position (e.g., Data Analyst, Backend Developer)")
            .allow_empty(true)
            .interact_text()?,
    };

    let level = match args.level {
        Some(level) => level,
        None => {
            let labels = Level::ALL.map(|level| level.label());
            let selected = Select::with_theme(&theme)
                .with_prompt("Level")
                .items(&labels)
                .default(position_of(&Level::ALL, Level::default()))
                .interact()?;
            Level::ALL[selected]
        }
    };

    let topic = match args.topic {
        Some(topic) => topic,
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Topic / Focus (e.g., SQL, Machine Learning, System Design)")
            .allow_empty(true)
            .interact_text()?,
    };

    let language = match args.language {
        Some(language) => language,
        None => {
            let labels = Language::ALL.map(|language| language.label());
            let selected = Select::with_theme(&theme)
                .with_prompt("Language")
                .items(&labels)
                .default(position_of(&Language::ALL, Language::default()))
                .interact()?;
            Language::ALL[selected]
        }
    };

    let question_count = match args.count {
        Some(count) => count,
        None => Input::<u8>::with_theme(&theme)
            .with_prompt("Number of Questions")
            .default(DEFAULT_QUESTIONS)
            .validate_with(|count: &u8| validate_count(*count))
            .interact_text()?,
    };

    Ok(StudySetForm {
        role,
        level,
        topic,
        question_count,
        language,
    })
}

fn position_of<T: PartialEq>(choices: &[T], value: T) -> usize {
    choices
        .iter()
        .position(|choice| *choice == value)
        .unwrap_or_default()
}

fn validate_count(count: u8) -> Result<(), String> {
    if QUESTION_COUNT_RANGE.contains(&count) {
        Ok(())
    } else {
        Err(format!(
            "Pick between {} and {} questions",
            QUESTION_COUNT_RANGE.start(),
            QUESTION_COUNT_RANGE.end()
        ))
    }
}
