//! zenith - ask the Zenith server about your system
//!
//! Usage:
//!   zenith How many errors in the last hour?
//!   zenith --recommend
//!   zenith --feedback good --id 42

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser, ValueEnum};
use zenith_sdk::{FeedbackValue, QueryResponse, ZenithClient};

const DEFAULT_SERVER: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Rating {
    Good,
    Bad,
}

impl From<Rating> for FeedbackValue {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Good => FeedbackValue::good(),
            Rating::Bad => FeedbackValue::bad(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "zenith")]
#[command(about = "Ask questions about system telemetry in plain language")]
#[command(version)]
#[command(group(ArgGroup::new("mode").args(["question", "recommend", "feedback"]).required(true)))]
struct Args {
    /// Zenith server address
    #[arg(long, env = "ZENITH_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Ask for performance recommendations
    #[arg(long)]
    recommend: bool,

    /// Rate a previous answer
    #[arg(long, value_enum, requires = "id")]
    feedback: Option<Rating>,

    /// Interaction id printed with the answer being rated
    #[arg(long)]
    id: Option<i64>,

    /// Question, e.g. "How many errors in the last hour?"
    question: Vec<String>,
}

fn print_answer(response: QueryResponse) -> Result<()> {
    if let Some(error) = response.error {
        match response.interaction_id {
            Some(id) => bail!("Server error (interaction {id}): {error}"),
            None => bail!("Server error: {error}"),
        }
    }

    println!("\n--- Zenith Analysis ---");
    println!("{}", response.answer.unwrap_or_default());
    if let Some(id) = response.interaction_id {
        println!("\n(interaction id: {id})");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = ZenithClient::new(args.server.as_str())?;
    let unreachable = || format!("Error contacting server at {}. Is zenith-server running?", args.server);

    if let Some(rating) = args.feedback {
        let id = args.id.context("--feedback requires --id")?;
        let response = client
            .feedback(id, rating.into())
            .await
            .with_context(unreachable)?;
        println!("Feedback recorded ({})", response.status);
        return Ok(());
    }

    let response = if args.recommend {
        client.recommend().await.with_context(unreachable)?
    } else {
        client
            .query(&args.question.join(" "))
            .await
            .with_context(unreachable)?
    };

    print_answer(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_question_words_are_collected() {
        let args = Args::try_parse_from(["zenith", "how", "busy", "is", "the", "cpu?"]).unwrap();
        assert_eq!(args.question.join(" "), "how busy is the cpu?");
        assert_eq!(args.server, DEFAULT_SERVER);
    }

    #[test]
    fn test_feedback_requires_id() {
        assert!(Args::try_parse_from(["zenith", "--feedback", "good"]).is_err());
        let args = Args::try_parse_from(["zenith", "--feedback", "bad", "--id", "7"]).unwrap();
        assert!(matches!(args.feedback, Some(Rating::Bad)));
        assert_eq!(args.id, Some(7));
    }

    #[test]
    fn test_mode_is_required() {
        assert!(Args::try_parse_from(["zenith"]).is_err());
    }

    #[test]
    fn test_error_response_fails() {
        let err = print_answer(QueryResponse::error(Some(3), "boom")).unwrap_err();
        assert_eq!(err.to_string(), "Server error (interaction 3): boom");
        assert!(print_answer(QueryResponse::answer(Some(3), "fine")).is_ok());
    }
}
