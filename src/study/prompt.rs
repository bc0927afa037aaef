use super::request::StudySetRequest;

pub const SYSTEM_PROMPT: &str = r#"
You are an expert interviewer and tutor.

Create a study set of interview questions.
Rules:
- Keep it concise.
- For each question provide: Question, Hint (1 line), Answer (short, 2–5 bullets or 2–4 lines).
- Return as plain text using this exact template repeatedly:

Q1: ...
H1: ...
A1: ...
Q2: ...
H2: ...
A2: ...
"#;

pub fn build_prompt(request: &StudySetRequest) -> String {
    format!(
        "\nRole: {role}\n\
         Level: {level}\n\
         Topic: {topic}\n\
         Number of questions: {count}\n\
         Language: {language}\n\n\
         Generate the study set now. Keep answers short and practical.\n",
        role = request.role(),
        level = request.level(),
        topic = request.topic(),
        count = request.question_count(),
        language = request.language(),
    )
}
