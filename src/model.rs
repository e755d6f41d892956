/// Style directives sent with every request.
pub const SYSTEM_INSTRUCTIONS: [&str; 4] = [
    "Answer in as few words as possible. Use a brief style with short replies.",
    "Skip filler, pleasantries and restating the question.",
    "Do not leave out relevant information.",
    "Do not use markdown or other markup unless asked to.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: Vec<String>,
    pub contents: Vec<String>,
}

impl Prompt {
    pub fn new(contents: Vec<String>) -> Self {
        Self {
            system: SYSTEM_INSTRUCTIONS.iter().map(|s| (*s).to_string()).collect(),
            contents,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub fragments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub candidates: Vec<Candidate>,
}

impl Reply {
    /// Every text fragment of every candidate, in order.
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.candidates
            .iter()
            .flat_map(|candidate| candidate.fragments.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::{Candidate, Prompt, Reply, SYSTEM_INSTRUCTIONS};

    #[test]
    fn prompt_carries_fixed_system_instructions() {
        let prompt = Prompt::new(vec!["why is the sky blue".to_string()]);
        assert_eq!(prompt.system, SYSTEM_INSTRUCTIONS);
        assert_eq!(prompt.contents, vec!["why is the sky blue".to_string()]);
    }

    #[test]
    fn reply_fragments_span_all_candidates() {
        let reply = Reply {
            candidates: vec![
                Candidate {
                    fragments: vec!["a".to_string(), "b".to_string()],
                },
                Candidate::default(),
                Candidate {
                    fragments: vec!["c".to_string()],
                },
            ],
        };
        assert_eq!(reply.fragments().collect::<String>(), "abc");
    }
}
