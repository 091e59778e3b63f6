//! # Console
//!
//! The read-eval loop state: the API, the session, and the mounted screen.  Every input
//! line is one command; output is buffered so the caller decides where it goes.
//!
//! A pending delete confirmation captures the next line: `y` or `yes` confirms, anything
//! else cancels.

use crate::api::LoanApi;
use crate::cli_utils::OutputFormat;
use crate::commands::errors::{UserError, format_cli_error};
use crate::commands::navigation::{Screens, on_kind_async};
use crate::commands::shared::{parse_arg, tokenize};
use crate::commands::{auth, entity, query};
use crate::config::ClientConfig;
use crate::http_utils::HttpError;
use crate::notify::{Banner, Tone};
use crate::session::Session;
use crate::EntityKind;

/// Console usage text.
pub const USAGE: &str = r#"Commands:
  login <username> <password>                  Log in
  register name=.. email=.. userName=.. password=.. securityAnswer1=.. securityAnswer2=..
  reset-password userName=.. name=.. email=.. securityAnswer1=.. securityAnswer2=.. newPassword=..
  logout                                       Log out and close every screen
  <kind> list                                  Show the records of a kind
  <kind> refresh                               Fetch the records again
  <kind> new [field=value...]                  Start a new record
  <kind> edit <id> [field=value...]            Start editing a listed record
  <kind> set field=value...                    Change fields of the open form
  <kind> show                                  Show the open form
  <kind> save                                  Validate and submit the open form
  <kind> cancel                                Discard the open form
  <kind> delete <id>                           Delete a record (asks first)
  <kind> options                               Show the choices for reference fields
  query <name> <value>                         Run a customer lookup
  dismiss                                      Hide the last notice
  help                                         Show this text
  quit | exit                                  Leave

Kinds: city, state, country, occupation, coverage, loan-type, customer, loan
Queries: by-id, by-city, by-gender, born-before, count-by-city, premium-above,
         by-occupation, born-after"#;

/// Whether the loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop.
    Quit,
}

/// State of an interactive session.
pub struct Console {
    pub(crate) api: LoanApi,
    pub(crate) output: OutputFormat,
    pub(crate) session: Session,
    pub(crate) screens: Screens,
    lines: Vec<String>,
}

impl Console {
    /// A logged-out console over `api`.
    pub fn new(api: LoanApi, output: OutputFormat) -> Self {
        Self {
            api,
            output,
            session: Session::new(),
            screens: Screens::default(),
            lines: Vec::new(),
        }
    }

    /// A console for the configured server.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        Ok(Self::new(LoanApi::new(&config.base_url)?, config.output))
    }

    /// The session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The mounted screen and its lists.
    pub fn screens(&self) -> &Screens {
        &self.screens
    }

    /// The prompt for the next line.
    pub fn prompt(&self) -> String {
        if let Some(kind) = self.screens.pending_confirm() {
            return format!("delete {}? [y/N] ", kind.noun());
        }
        if !self.session.is_logged_in() {
            return format!("loandesk ({})> ", self.session.mode());
        }
        match self.screens.open() {
            Some(kind) => format!("loandesk/{}> ", kind.command()),
            None => "loandesk> ".to_string(),
        }
    }

    /// Output produced since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub(crate) fn say(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Prints the banner of the mounted screen.
    pub(crate) fn say_banner(&mut self) {
        if let Some(Banner { tone, message }) = self.screens.banner() {
            match tone {
                Tone::Success => self.say(message),
                Tone::Error => self.say(format!("Error: {}", message)),
            }
        }
    }

    /// Runs one input line.
    pub async fn execute(&mut self, line: &str) -> Flow {
        if let Some(kind) = self.screens.pending_confirm() {
            let confirmed = matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes");
            on_kind_async!(kind, resolve_confirm(self, confirmed));
            return Flow::Continue;
        }
        let args = match tokenize(line) {
            Ok(args) => args,
            Err(e) => {
                self.say(format_cli_error(&e));
                return Flow::Continue;
            }
        };
        if args.is_empty() {
            return Flow::Continue;
        }
        match self.run(&args).await {
            Ok(flow) => flow,
            Err(e) => {
                tracing::debug!(command = %args[0], error = %e, "command failed");
                self.say(format_cli_error(&e));
                Flow::Continue
            }
        }
    }

    async fn run(&mut self, args: &[String]) -> Result<Flow, UserError> {
        match args[0].as_str() {
            "help" => self.say(USAGE),
            "quit" | "exit" => return Ok(Flow::Quit),
            "login" => auth::handle_login(&args[1..], self).await?,
            "register" => auth::handle_register(&args[1..], self).await?,
            "reset-password" => auth::handle_reset_password(&args[1..], self).await?,
            _ if !self.session.is_logged_in() => {
                return Err(UserError::with_usage(
                    "Please log in first",
                    "login <username> <password>, register or reset-password",
                ));
            }
            "logout" => auth::handle_logout(&args[1..], self).await?,
            "query" => query::handle_query_command(&args[1..], self).await?,
            "dismiss" => self.screens.dismiss(),
            other => {
                let kind: EntityKind = parse_arg(other).map_err(|e| UserError {
                    message: format!("Unknown command '{}'", other),
                    usage_hint: e.usage_hint,
                })?;
                entity::handle_entity_command(kind, &args[1..], self).await?
            }
        }
        Ok(Flow::Continue)
    }
}

async fn resolve_confirm<R: crate::commands::navigation::ScreenSlot>(
    console: &mut Console,
    confirmed: bool,
) {
    let Some(screen) = console.screens.screen_mut::<R>() else {
        return;
    };
    if confirmed {
        screen.confirm_delete(&console.api).await;
        console.say_banner();
    } else {
        screen.cancel_delete();
        console.say("Delete cancelled");
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::test_helpers::FakeApi;

    async fn logged_in(fake: &FakeApi) -> Console {
        let mut console = Console::new(fake.api(), OutputFormat::Table);
        console.execute("login admin Secret#123").await;
        console.take_output();
        fake.clear_journal();
        console
    }

    #[tokio::test]
    async fn commands_need_login() {
        let fake = FakeApi::start().await;
        let mut console = Console::new(fake.api(), OutputFormat::Table);
        assert_eq!(console.prompt(), "loandesk (login)> ");
        console.execute("city list").await;
        assert_eq!(
            console.take_output(),
            vec!["Error: Please log in first\nHint: login <username> <password>, register or reset-password"]
        );
        assert!(fake.journal().is_empty());
        assert_eq!(console.execute("help").await, Flow::Continue);
        assert_eq!(console.execute("quit").await, Flow::Quit);
    }

    #[tokio::test]
    async fn unknown_command() {
        let fake = FakeApi::start().await;
        let mut console = logged_in(&fake).await;
        console.execute("planet list").await;
        let output = console.take_output();
        assert!(output[0].starts_with("Error: Unknown command 'planet'"));
    }

    #[tokio::test]
    async fn delete_confirmation_captures_next_line() {
        let fake = FakeApi::start().await;
        fake.seed(
            EntityKind::Occupation,
            vec![
                json!({"occupationId": 1, "occupationName": "Farmer"}),
                json!({"occupationId": 2, "occupationName": "Teacher"}),
            ],
        );
        let mut console = logged_in(&fake).await;
        console.execute("occupation delete 2").await;
        assert_eq!(
            console.take_output(),
            vec!["Are you sure you want to delete occupation with ID: 2? [y/N]"]
        );
        assert_eq!(console.prompt(), "delete occupation? [y/N] ");

        console.execute("list").await;
        assert_eq!(console.take_output(), vec!["Delete cancelled"]);
        assert!(fake.journal().iter().all(|r| r.method != "DELETE"));

        console.execute("occupation delete 2").await;
        console.execute("yes").await;
        let output = console.take_output();
        assert_eq!(output.last().map(String::as_str), Some("Deleted Successfully"));
        let deletes: Vec<_> = fake
            .journal()
            .into_iter()
            .filter(|r| r.method == "DELETE")
            .collect();
        assert_eq!(deletes.len(), 1);
        assert_eq!(deletes[0].path, "occupations/2");
        assert_eq!(fake.records(EntityKind::Occupation).len(), 1);
    }

    #[tokio::test]
    async fn logout_unmounts_screens() {
        let fake = FakeApi::start().await;
        let mut console = logged_in(&fake).await;
        console.execute("state list").await;
        assert_eq!(console.prompt(), "loandesk/state> ");
        console.execute("logout").await;
        assert!(!console.session().is_logged_in());
        assert_eq!(console.screens().open(), None);
        assert_eq!(console.prompt(), "loandesk (login)> ");
    }

    #[tokio::test]
    async fn unterminated_quote_is_reported() {
        let fake = FakeApi::start().await;
        let mut console = logged_in(&fake).await;
        console.execute("city new cityName=\"Nai").await;
        assert!(console.take_output()[0].starts_with("Error: Unterminated \" quote"));
        assert!(fake.journal().is_empty());
    }
}
