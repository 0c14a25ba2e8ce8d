//! Interactive line-driven app.
//!
//! Reads one command per line from stdin, feeds it to the workflow runtime and
//! reprints the screen whenever it changes.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clausewise_core::config::Config;
use clausewise_core::{Attachment, FileSessionStore, SessionStore, Sender};
use clausewise_flow::{
    AppState, BrowserNavigator, FlowRuntime, LoginMode, Services, UiEvent, View, WorkflowState,
    active_view,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  start                              open the login (or service selection when logged in)
  login <email> <password>           sign in
  signup <name> <email> <password>   create an account
  mode                               switch between sign-in and sign-up
  cancel                             close the login or service selection
  analysis | education               pick a service
  retry | launch                     contract analysis launcher
  say <text>                         chat with the assistant
  attach <file> [text]               send a file name to the assistant
  back | close                       leave the current screen
  logout | quit";

const DASHBOARD_HINT: &str = "> say <text> | attach <file> [text] | back | close | logout";

pub async fn run(config: &Config) -> Result<()> {
    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open_default());
    let services = Services::from_config(config, session, Arc::new(BrowserNavigator))?;
    let mut runtime = FlowRuntime::new(services);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_screen = String::new();

    while !runtime.state.should_quit {
        let screen = render(&runtime.state);
        if screen != last_screen {
            println!("{screen}");
            last_screen = screen;
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("read stdin")? else {
                    break;
                };
                match parse_command(&line, runtime.state.workflow) {
                    Ok(Some(Input::Event(event))) => runtime.dispatch(event),
                    Ok(Some(Input::Help)) => println!("{HELP}"),
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                }
            }
            () = runtime.pump() => {}
        }
    }

    Ok(())
}

#[derive(Debug)]
enum Input {
    Event(UiEvent),
    Help,
}

/// Maps one input line to an intent. Blank lines map to nothing.
fn parse_command(line: &str, workflow: WorkflowState) -> Result<Option<Input>> {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let event = match command {
        "" => return Ok(None),
        "help" | "?" => return Ok(Some(Input::Help)),
        "start" => UiEvent::GetStarted,
        "mode" => UiEvent::ToggleSignupMode,
        "login" => {
            let [email, password] = args.as_slice() else {
                bail!("usage: login <email> <password>");
            };
            UiEvent::SubmitLogin {
                email: (*email).to_string(),
                password: (*password).to_string(),
            }
        }
        "signup" => {
            let [name, email, password] = args.as_slice() else {
                bail!("usage: signup <name> <email> <password>");
            };
            UiEvent::SubmitSignup {
                name: (*name).to_string(),
                email: (*email).to_string(),
                password: (*password).to_string(),
            }
        }
        "cancel" if workflow == WorkflowState::LoginModal => UiEvent::CancelLogin,
        "cancel" => UiEvent::CancelServiceSelection,
        "analysis" => UiEvent::PickContractAnalysis,
        "education" => UiEvent::PickEducation,
        "back" => UiEvent::Back,
        "retry" => UiEvent::RetryProbe,
        "launch" => UiEvent::LaunchApp,
        "say" => UiEvent::SendChat {
            text: rest.to_string(),
            attachment: None,
        },
        "attach" => {
            let Some((file, text)) = rest
                .split_once(char::is_whitespace)
                .or((!rest.is_empty()).then_some((rest, "")))
            else {
                bail!("usage: attach <file> [text]");
            };
            UiEvent::SendChat {
                text: text.trim().to_string(),
                attachment: Some(Attachment::new(file)),
            }
        }
        "close" => UiEvent::CloseChat,
        "logout" => UiEvent::Logout,
        "quit" | "exit" => UiEvent::Quit,
        other => bail!("unknown command `{other}` (try `help`)"),
    };
    Ok(Some(Input::Event(event)))
}

/// Renders the active screen as plain text.
fn render(app: &AppState) -> String {
    let mut out = String::new();
    match active_view(app) {
        View::Landing => {
            out.push_str("== ClauseWise ==\nFind the loopholes before they find you.\n");
            if let Some(error) = &app.session_error {
                let _ = writeln!(out, "! Could not update your saved session: {error}");
            }
            out.push_str("> start | help | quit");
        }
        View::Login(mode) => {
            let (title, hint) = match mode {
                LoginMode::Login => ("== Sign in ==", "> login <email> <password> | mode | cancel"),
                LoginMode::Signup => (
                    "== Create account ==",
                    "> signup <name> <email> <password> | mode | cancel",
                ),
            };
            let _ = writeln!(out, "{title}");
            if app.auth_pending() {
                out.push_str("Please wait...\n");
            }
            if let Some(notice) = &app.login.notice {
                let _ = writeln!(out, "{notice}");
            }
            if let Some(error) = &app.login.error {
                let _ = writeln!(out, "! {error}");
            }
            out.push_str(hint);
        }
        View::ServiceSelection => {
            out.push_str("== Choose a service ==\n");
            if let Some(identity) = &app.identity {
                let _ = writeln!(out, "Signed in as {}", identity.name);
            }
            out.push_str("  analysis   Contract analysis\n");
            out.push_str("  education  Contract education chat\n");
            out.push_str("> analysis | education | cancel | logout");
        }
        View::Launcher => {
            out.push_str("== Contract Analysis ==\n");
            let _ = writeln!(out, "{}", app.launch.status.message());
            if let Some(url) = &app.launch.launch_url {
                let _ = writeln!(out, "Ready at {url}");
            }
            if let Some(error) = &app.launch.error {
                let _ = writeln!(out, "! {error}");
            }
            out.push_str("> launch | retry | back | logout");
        }
        View::Dashboard => {
            out.push_str("== Dashboard ==\n");
            for message in &app.chat.messages {
                let who = match message.sender {
                    Sender::User => "you",
                    Sender::Assistant => "assistant",
                };
                let _ = writeln!(
                    out,
                    "[{}] {who}: {}",
                    message.timestamp.format("%H:%M"),
                    message.text
                );
            }
            if app.awaiting_reply() {
                out.push_str("assistant is typing...\n");
            }
            out.push_str(DASHBOARD_HINT);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use clausewise_core::Identity;
    use clausewise_flow::update;

    use super::*;

    fn parse(line: &str) -> UiEvent {
        match parse_command(line, WorkflowState::Landing) {
            Ok(Some(Input::Event(event))) => event,
            other => panic!("expected an event for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_login() {
        let UiEvent::SubmitLogin { email, password } = parse("login jane@x.com s3cret") else {
            panic!("expected SubmitLogin");
        };
        assert_eq!(email, "jane@x.com");
        assert_eq!(password, "s3cret");
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(parse_command("login jane@x.com", WorkflowState::LoginModal).is_err());
        assert!(parse_command("signup Jane jane@x.com", WorkflowState::LoginModal).is_err());
        assert!(parse_command("attach", WorkflowState::Dashboard).is_err());
    }

    #[test]
    fn test_parse_say_keeps_whole_line() {
        let UiEvent::SendChat { text, attachment } = parse("say is clause 4 fair?") else {
            panic!("expected SendChat");
        };
        assert_eq!(text, "is clause 4 fair?");
        assert!(attachment.is_none());
    }

    #[test]
    fn test_parse_attach_with_and_without_text() {
        let UiEvent::SendChat { text, attachment } = parse("attach lease.pdf check this") else {
            panic!("expected SendChat");
        };
        assert_eq!(text, "check this");
        assert_eq!(attachment, Some(Attachment::new("lease.pdf")));

        let UiEvent::SendChat { text, attachment } = parse("attach nda.pdf") else {
            panic!("expected SendChat");
        };
        assert_eq!(text, "");
        assert_eq!(attachment, Some(Attachment::new("nda.pdf")));
    }

    #[test]
    fn test_cancel_depends_on_screen() {
        assert!(matches!(
            parse_command("cancel", WorkflowState::LoginModal),
            Ok(Some(Input::Event(UiEvent::CancelLogin)))
        ));
        assert!(matches!(
            parse_command("cancel", WorkflowState::ServiceSelection),
            Ok(Some(Input::Event(UiEvent::CancelServiceSelection)))
        ));
    }

    #[test]
    fn test_blank_and_unknown_lines() {
        assert!(matches!(
            parse_command("   ", WorkflowState::Landing),
            Ok(None)
        ));
        let err = parse_command("dance", WorkflowState::Landing).unwrap_err();
        assert!(err.to_string().contains("unknown command `dance`"));
    }

    #[test]
    fn test_render_shows_login_error() {
        let mut app = AppState::new(None, "http://localhost:3000/contract-analysis");
        app.workflow = WorkflowState::LoginModal;
        app.login.error = Some("Invalid credentials".to_string());

        let screen = render(&app);

        assert!(screen.contains("Sign in"));
        assert!(screen.contains("! Invalid credentials"));
    }

    #[test]
    fn test_render_landing_shows_session_error() {
        let mut app = AppState::new(None, "http://localhost:3000/contract-analysis");
        app.session_error = Some("permission denied".to_string());

        let screen = render(&app);

        assert!(screen.contains("! Could not update your saved session: permission denied"));
    }

    #[test]
    fn test_every_dashboard_command_does_something() {
        let commands = DASHBOARD_HINT
            .trim_start_matches("> ")
            .split(" | ")
            .map(|usage| match usage.split_whitespace().next() {
                Some("say") => "say is clause 4 fair?",
                Some("attach") => "attach lease.pdf",
                Some(other) => other,
                None => panic!("empty usage in hint"),
            });

        for line in commands {
            let mut app = AppState::new(
                Some(Identity::new("Jane", "jane@x.com")),
                "http://localhost:3000/contract-analysis",
            );
            app.workflow = WorkflowState::Dashboard;

            let Ok(Some(Input::Event(event))) = parse_command(line, app.workflow) else {
                panic!("`{line}` is not a command");
            };
            let effects = update(&mut app, event);

            let changed = app.workflow != WorkflowState::Dashboard || app.chat.messages.len() > 1;
            assert!(changed, "`{line}` had no effect on the dashboard");
            assert!(!effects.is_empty() || line == "back" || line == "close");
        }
    }

    #[test]
    fn test_render_dashboard_transcript() {
        let mut app = AppState::new(
            Some(Identity::new("Jane", "jane@x.com")),
            "http://localhost:3000/contract-analysis",
        );
        app.workflow = WorkflowState::Dashboard;

        let screen = render(&app);

        assert!(screen.contains("== Dashboard =="));
        assert!(screen.contains("assistant: I will analyse your contract"));
    }
}
