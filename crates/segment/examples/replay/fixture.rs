#[derive(Clone, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Fixture {
    Standup,
    Interview,
}

impl Fixture {
    pub fn json(&self) -> &'static str {
        match self {
            Self::Standup => scribe_data::standup_1::SESSION_JSON,
            Self::Interview => scribe_data::interview_1::SESSION_JSON,
        }
    }
}
