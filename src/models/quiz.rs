use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub const DEFAULT_DURATION_SECONDS: u32 = 300;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrInt {
    String(String),
    Int(i64),
}

impl From<StringOrInt> for String {
    fn from(value: StringOrInt) -> Self {
        match value {
            StringOrInt::String(s) => s,
            StringOrInt::Int(i) => i.to_string(),
        }
    }
}

fn deserialize_id_flexible<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrInt::deserialize(deserializer)?.into())
}

fn deserialize_optional_id_flexible<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrInt>::deserialize(deserializer)?.map(String::from))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizDefinition {
    #[serde(alias = "_id", deserialize_with = "deserialize_id_flexible")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "duration_seconds")]
    pub duration_seconds: Option<u32>,
    #[validate(length(min = 1, message = "quiz has no questions"), nested)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, alias = "_id", deserialize_with = "deserialize_optional_id_flexible")]
    pub id: Option<String>,
    #[serde(alias = "question")]
    pub text: String,
    #[validate(length(min = 2, message = "question needs at least two options"))]
    pub options: Vec<String>,
    #[serde(default, alias = "correct_answer_index", alias = "correctAnswer")]
    pub correct_answer_index: Option<i32>,
}

impl QuizDefinition {
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS)
    }

    /// Fills in the fields a server may omit: positional `q{n}` ids and the
    /// default duration.
    pub fn normalized(mut self) -> Self {
        for (idx, q) in self.questions.iter_mut().enumerate() {
            let missing = q.id.as_deref().map_or(true, |id| id.trim().is_empty());
            if missing {
                q.id = Some(format!("q{}", idx + 1));
            }
        }
        self.duration_seconds = Some(self.duration_seconds());
        self
    }
}

impl Question {
    pub fn id_or_position(&self, idx: usize) -> String {
        self.id.clone().unwrap_or_else(|| format!("q{}", idx + 1))
    }
}
