//! Question bank, topic pool and answer checking
//!
//! Questions come from an external JSON mapping of topic name to question
//! list. The built-in "Machine Learning" topic is always present so a quiz
//! brick can be answered even before (or without) a successful load.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Topic used when nothing else is enabled or loaded
pub const DEFAULT_TOPIC: &str = "Machine Learning";

/// Errors raised while loading external quiz/cheat data
#[derive(Debug, Error)]
pub enum DataError {
    /// Malformed JSON
    #[error("invalid data file: {0}")]
    Json(#[from] serde_json::Error),

    /// A topic with no questions
    #[error("topic has no questions: {0}")]
    EmptyTopic(String),

    /// `answer` does not name one of the options
    #[error("question {index} in topic {topic:?} has answer {answer} but {options} options")]
    BadAnswerIndex {
        topic: String,
        index: usize,
        answer: usize,
        options: usize,
    },

    /// Reading a local data file (native only)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Network/fetch failure (web only)
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// 1-based number of the correct option, as shown to the player
    pub answer: usize,
}

impl Question {
    /// Prompt text with numbered options, one per line
    pub fn prompt(&self) -> String {
        let mut text = self.question.clone();
        for (i, opt) in self.options.iter().enumerate() {
            text.push('\n');
            text.push_str(&format!("{}. {}", i + 1, opt));
        }
        text
    }
}

/// Check a raw player response against a question.
///
/// Leading whitespace is skipped and the leading integer is parsed, so
/// "3", " 3" and "3." all count as option 3. Anything without a leading
/// integer is wrong.
pub fn check_answer(question: &Question, response: Option<&str>) -> bool {
    response
        .and_then(parse_leading_int)
        .is_some_and(|n| n >= 1 && n as usize == question.answer)
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Question bank keyed by topic name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    topics: BTreeMap<String, Vec<Question>>,
}

impl Default for QuestionBank {
    fn default() -> Self {
        let mut topics = BTreeMap::new();
        topics.insert(DEFAULT_TOPIC.to_string(), builtin_questions());
        Self { topics }
    }
}

impl QuestionBank {
    /// Parse and validate a question bank. The default topic is added if the
    /// file does not provide one.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let mut topics: BTreeMap<String, Vec<Question>> = serde_json::from_str(json)?;

        for (topic, questions) in &topics {
            if questions.is_empty() {
                return Err(DataError::EmptyTopic(topic.clone()));
            }
            for (index, q) in questions.iter().enumerate() {
                if q.answer == 0 || q.answer > q.options.len() {
                    return Err(DataError::BadAnswerIndex {
                        topic: topic.clone(),
                        index,
                        answer: q.answer,
                        options: q.options.len(),
                    });
                }
            }
        }

        if !topics.contains_key(DEFAULT_TOPIC) {
            log::debug!("Question bank has no {DEFAULT_TOPIC:?} topic, adding built-in one");
            topics.insert(DEFAULT_TOPIC.to_string(), builtin_questions());
        }

        log::info!("Loaded {} quiz topics", topics.len());
        Ok(Self { topics })
    }

    /// Topic names in stable order
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn questions(&self, topic: &str) -> Option<&[Question]> {
        self.topics.get(topic).map(Vec::as_slice)
    }

    /// Questions from every enabled topic the bank knows about, falling back
    /// to the default topic when that leaves nothing
    pub fn pool(&self, selection: &TopicSelection) -> Vec<&Question> {
        let pool: Vec<&Question> = selection
            .enabled()
            .filter_map(|t| self.topics.get(t))
            .flatten()
            .collect();
        if !pool.is_empty() {
            return pool;
        }
        self.topics
            .get(DEFAULT_TOPIC)
            .map(|qs| qs.iter().collect())
            .unwrap_or_default()
    }

    /// Pick one question uniformly from the enabled pool
    pub fn pick<R: Rng>(&self, selection: &TopicSelection, rng: &mut R) -> Option<Question> {
        let pool = self.pool(selection);
        if pool.is_empty() {
            return None;
        }
        let i = rng.random_range(0..pool.len());
        Some(pool[i].clone())
    }
}

/// Which topics the player has ticked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSelection {
    enabled: BTreeSet<String>,
}

impl TopicSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, topic: &str, enabled: bool) {
        if enabled {
            self.enabled.insert(topic.to_string());
        } else {
            self.enabled.remove(topic);
        }
    }

    pub fn is_enabled(&self, topic: &str) -> bool {
        self.enabled.contains(topic)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TopicSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A cheat description shown once cheats unlock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cheat {
    pub name: String,
    pub description: String,
}

/// Cheat list file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatList {
    pub cheats: Vec<Cheat>,
}

impl CheatList {
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let list: CheatList = serde_json::from_str(json)?;
        log::info!("Loaded {} cheats", list.cheats.len());
        Ok(list)
    }
}

fn builtin_questions() -> Vec<Question> {
    let q = |question: &str, options: [&str; 4], answer| Question {
        question: question.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        answer,
    };
    vec![
        q(
            "Which algorithm can be used for both classification and regression?",
            ["K-means", "Linear Regression", "Decision Tree", "Apriori"],
            3,
        ),
        q(
            "What does an activation function introduce in a neural network?",
            ["Bias", "Non-linearity", "Regularization", "Momentum"],
            2,
        ),
        q(
            "Which metric is suitable for evaluating imbalanced classification problems?",
            ["Accuracy", "Mean Squared Error", "Precision-Recall", "R-squared"],
            3,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BANK_JSON: &str = r#"{
        "Rust": [
            { "question": "Which keyword moves a value into a closure?",
              "options": ["ref", "move", "box"], "answer": 2 }
        ],
        "Networking": [
            { "question": "Which port does HTTPS use by default?",
              "options": ["80", "443"], "answer": 2 },
            { "question": "Which layer is TCP?",
              "options": ["Transport", "Session"], "answer": 1 }
        ]
    }"#;

    #[test]
    fn test_check_answer_parses_leading_integer() {
        let q = &builtin_questions()[0];
        assert!(check_answer(q, Some("3")));
        assert!(check_answer(q, Some("  3")));
        assert!(check_answer(q, Some("3. Decision Tree")));
        assert!(!check_answer(q, Some("2")));
        assert!(!check_answer(q, Some("Decision Tree")));
        assert!(!check_answer(q, Some("")));
        assert!(!check_answer(q, Some("-3")));
        assert!(!check_answer(q, None));
    }

    #[test]
    fn test_prompt_numbers_options() {
        let q = &builtin_questions()[1];
        let prompt = q.prompt();
        assert!(prompt.starts_with("What does an activation function"));
        assert!(prompt.contains("\n1. Bias"));
        assert!(prompt.ends_with("\n4. Momentum"));
    }

    #[test]
    fn test_from_json_adds_default_topic() {
        let bank = QuestionBank::from_json(BANK_JSON).unwrap();
        let topics: Vec<&str> = bank.topics().collect();
        assert_eq!(topics, vec![DEFAULT_TOPIC, "Networking", "Rust"]);
        assert_eq!(bank.questions("Networking").unwrap().len(), 2);
    }

    #[test]
    fn test_from_json_rejects_bad_answer() {
        let json = r#"{ "Rust": [ { "question": "?", "options": ["a"], "answer": 2 } ] }"#;
        let err = QuestionBank::from_json(json).unwrap_err();
        assert!(matches!(err, DataError::BadAnswerIndex { answer: 2, options: 1, .. }));

        let json = r#"{ "Rust": [] }"#;
        assert!(matches!(
            QuestionBank::from_json(json),
            Err(DataError::EmptyTopic(_))
        ));

        assert!(matches!(
            QuestionBank::from_json("not json"),
            Err(DataError::Json(_))
        ));
    }

    #[test]
    fn test_pool_uses_enabled_topics() {
        let bank = QuestionBank::from_json(BANK_JSON).unwrap();
        let selection: TopicSelection = ["Networking"].into_iter().collect();
        let pool = bank.pool(&selection);
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|q| q.options.len() == 2));
    }

    #[test]
    fn test_pool_falls_back_to_default_topic() {
        let bank = QuestionBank::from_json(BANK_JSON).unwrap();

        // Nothing ticked
        let pool = bank.pool(&TopicSelection::new());
        assert_eq!(pool.len(), builtin_questions().len());

        // Only unknown topics ticked
        let selection: TopicSelection = ["History"].into_iter().collect();
        assert_eq!(bank.pool(&selection).len(), builtin_questions().len());

        // Bank not loaded yet
        let unloaded = QuestionBank::default();
        let pool = unloaded.pool(&TopicSelection::new());
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_pick_is_deterministic_for_seed() {
        let bank = QuestionBank::from_json(BANK_JSON).unwrap();
        let selection: TopicSelection = ["Networking", "Rust"].into_iter().collect();
        let mut rng1 = Pcg32::seed_from_u64(7);
        let mut rng2 = Pcg32::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(
                bank.pick(&selection, &mut rng1),
                bank.pick(&selection, &mut rng2)
            );
        }
    }

    #[test]
    fn test_topic_selection_toggle() {
        let mut selection = TopicSelection::new();
        assert!(selection.is_empty());
        selection.set("Rust", true);
        assert!(selection.is_enabled("Rust"));
        selection.set("Rust", false);
        assert!(!selection.is_enabled("Rust"));
    }

    #[test]
    fn test_cheat_list_from_json() {
        let json = r#"{ "cheats": [ { "name": "Wrecking Ball", "description": "Double-tap space" } ] }"#;
        let list = CheatList::from_json(json).unwrap();
        assert_eq!(list.cheats.len(), 1);
        assert_eq!(list.cheats[0].name, "Wrecking Ball");
    }
}
