//! # Query Command Handler
//!
//! Runs the customer lookups.  The value is parsed before anything is mounted or sent,
//! so a malformed argument never reaches the server.

use crate::cli_utils::format_records;
use crate::commands::console::Console;
use crate::commands::errors::{UserError, to_user_error};
use crate::commands::navigation::open_queries;
use crate::commands::shared::validate_args_count;
use crate::query::QueryDisplay;
use crate::LookupQuery;

/// Handles `query <name> <value>`.
pub async fn handle_query_command(args: &[String], console: &mut Console) -> Result<(), UserError> {
    let usage = format!("Usage: query <{}> <value>", LookupQuery::NAMES.join("|"));
    validate_args_count(args, 2, 2, "query", &usage)?;
    let query = LookupQuery::parse(&args[0], &args[1]).map_err(to_user_error)?;
    tracing::debug!(name = query.name(), %query, "running lookup");

    let output = console.output;
    let (api, panel) = open_queries(console).await?;
    panel.dispatch(api, &query).await;
    let text = match panel.display() {
        QueryDisplay::Results(records) => format_records(records, output).map_err(UserError::new)?,
        QueryDisplay::Count(count) => format!("Count: {}", count),
        QueryDisplay::NoResults => "No results".to_string(),
        QueryDisplay::Failed(message) => return Err(UserError::new(message)),
    };
    console.say(text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cli_utils::OutputFormat;
    use crate::test_utils::test_helpers::FakeApi;
    use crate::EntityKind;

    async fn logged_in(fake: &FakeApi) -> Console {
        let mut console = Console::new(fake.api(), OutputFormat::Table);
        console.execute("login admin Secret#123").await;
        console.take_output();
        fake.clear_journal();
        console
    }

    fn customer(id: u64, first: &str) -> serde_json::Value {
        json!({
            "customerId": id,
            "firstName": first,
            "lastName": "Otieno",
            "gender": "F",
            "dob": "1988-02-11",
            "mobileNumber": "0722000000",
            "cityId": 1,
            "stateId": 2,
            "countryId": 3,
            "occupationId": 4
        })
    }

    #[tokio::test]
    async fn count_by_city() {
        let fake = FakeApi::start().await;
        fake.respond("customers/count-by-city/Nairobi", json!({"customerCount": 12}));
        let mut console = logged_in(&fake).await;
        console.execute("query count-by-city Nairobi").await;
        assert_eq!(console.take_output(), vec!["Count: 12"]);
        assert_eq!(console.screens().open(), Some(EntityKind::Customer));
    }

    #[tokio::test]
    async fn list_results_are_tabulated() {
        let fake = FakeApi::start().await;
        fake.respond(
            "customers/by-gender/F",
            json!({"customerListDTO": [customer(7, "Akinyi"), customer(8, "Njeri")]}),
        );
        let mut console = logged_in(&fake).await;
        console.execute("query by-gender f").await;
        let output = console.take_output();
        let lines: Vec<&str> = output[0].lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("customerId"));
        assert!(lines[1].contains("Akinyi"));
        assert!(lines[2].contains("Njeri"));
    }

    #[tokio::test]
    async fn single_record_by_id() {
        let fake = FakeApi::start().await;
        fake.seed(EntityKind::Customer, vec![customer(77, "Wairimu")]);
        let mut console = logged_in(&fake).await;
        console.execute("query by-id 77").await;
        assert!(console.take_output()[0].contains("Wairimu"));

        console.execute("query by-id 78").await;
        assert_eq!(
            console.take_output(),
            vec!["Error: Error executing query: No customer found"]
        );
    }

    #[tokio::test]
    async fn empty_lookup() {
        let fake = FakeApi::start().await;
        let mut console = logged_in(&fake).await;
        console.execute("query by-city Kisumu").await;
        assert_eq!(console.take_output(), vec!["No results"]);
    }

    #[tokio::test]
    async fn malformed_value_sends_nothing() {
        let fake = FakeApi::start().await;
        let mut console = logged_in(&fake).await;
        console.execute("query born-before 17/05/1990").await;
        assert!(console.take_output()[0].starts_with("Error: "));
        console.execute("query by-planet Mars").await;
        assert!(console.take_output()[0].contains("Available queries: by-id"));
        assert!(fake.journal().is_empty());
        assert_eq!(console.screens().open(), None);
    }
}
