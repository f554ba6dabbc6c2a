//! Subcommand handlers.
//!
//! Each handler drives one screen controller and prints to stdout.

use color_eyre::Result;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::debug;

use super::args::Command;
use crate::auth::{DuplicateField, SessionState};
use crate::client::MoodlogClient;
use crate::domain::navigation::{active_stack, ActiveStack};
use crate::error::{AuthError, MoodlogError};
use crate::models::{AnalysisResponse, AnalysisResult};
use crate::screens::{DiaryListScreen, ListQuery, SubmitOutcome};

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: usize = 60;

/// Restore the session, check it fits the command, and run it.
pub async fn dispatch(client: &MoodlogClient, command: Command) -> Result<()> {
    let state = client.session().initialize().await;
    let stack = active_stack(&state);
    debug!(command = command.name(), stack = stack.as_str(), "Dispatching");

    if command.requires_session() && stack != ActiveStack::App {
        return Err(MoodlogError::from(AuthError::NotAuthenticated).into());
    }

    match command {
        Command::Login { email } => login(client, &state, &email).await,
        Command::Logout => {
            client.session().sign_out().await;
            println!("Signed out.");
            Ok(())
        }
        Command::Status => {
            print_status(&state);
            Ok(())
        }
        Command::Signup => signup(client, &state).await,
        Command::List { search, date, page } => {
            let query = ListQuery {
                search: search.unwrap_or_default(),
                date,
                page: page.saturating_sub(1),
            };
            list(client.diary_list(), query).await
        }
        Command::Dates { month: (year, month) } => {
            if let Some(marks) = client.diary_list().calendar_marks(year, month).await? {
                if marks.is_empty() {
                    println!("No entries in {}-{:02}.", year, month);
                }
                for date in marks {
                    println!("{}", date);
                }
            }
            Ok(())
        }
        Command::Show { id } => {
            if let Some(entry) = client.entry_view(&id).load().await? {
                println!("{}  {}", entry.date_str(), entry.title);
                println!();
                println!("{}", entry.content);
                if entry.has_analysis {
                    println!();
                    println!("(analysis available: moodlog analyze {})", entry.id);
                }
            }
            Ok(())
        }
        Command::Write { title, content } => {
            let mut editor = client.new_entry();
            editor.set_title(title);
            editor.set_content(content);
            print_outcome(&editor.submit().await?);
            Ok(())
        }
        Command::Edit { id, title, content } => {
            let mut editor = client.edit_entry(&id);
            editor.load().await?;
            editor.set_title(title);
            editor.set_content(content);
            print_outcome(&editor.submit().await?);
            Ok(())
        }
        Command::Delete { id } => {
            client.entry_view(&id).delete().await?;
            println!("Deleted entry {}.", id);
            Ok(())
        }
        Command::Analyze { id, wait } => analyze(client, &id, wait).await,
    }
}

async fn login(client: &MoodlogClient, state: &SessionState, email: &str) -> Result<()> {
    if state.is_authenticated() {
        println!("Already signed in. Run `moodlog logout` first to switch accounts.");
        return Ok(());
    }
    let password = rpassword::prompt_password("Password: ")?;
    client.login_screen().submit(email, &password).await?;
    print_status(&client.session().state());
    Ok(())
}

async fn signup(client: &MoodlogClient, state: &SessionState) -> Result<()> {
    if state.is_authenticated() {
        println!("Already signed in. Run `moodlog logout` before creating an account.");
        return Ok(());
    }
    let screen = client.signup_screen();
    let config = client.config();
    let settle = config.debounce_delay + config.request_timeout;

    loop {
        screen.set_login_id(&prompt("Login ID: ")?);
        if report_check(screen.settled_check(DuplicateField::LoginId, settle).await) {
            break;
        }
    }

    loop {
        screen.set_email(&prompt("Email: ")?);
        if !report_check(screen.settled_check(DuplicateField::Email, settle).await) {
            continue;
        }
        let notice = screen.request_email_code().await?;
        println!("{}", notice.message);
        if !notice.success {
            continue;
        }
        screen.set_email_code(&prompt("Verification code: ")?);
        let notice = screen.verify_email_code().await?;
        println!("{}", notice.message);
        if notice.success {
            break;
        }
    }

    loop {
        screen.set_nickname(&prompt("Nickname: ")?);
        if report_check(screen.settled_check(DuplicateField::Nickname, settle).await) {
            break;
        }
    }

    loop {
        screen.set_password(&rpassword::prompt_password("Password: ")?);
        screen.set_confirm_password(&rpassword::prompt_password("Confirm password: ")?);
        match screen.form().password_error {
            Some(message) => println!("{}", message),
            None => break,
        }
    }

    let terms = confirm("Accept the terms of service? [y/N] ")?;
    let privacy = confirm("Accept the privacy policy? [y/N] ")?;
    screen.set_consents(terms, privacy);

    let message = screen.submit().await?;
    println!("{}", message);
    println!("Sign in with `moodlog login --email <email>`.");
    Ok(())
}

async fn list(mut screen: DiaryListScreen, query: ListQuery) -> Result<()> {
    screen.set_query(query);
    let Some(page) = screen.load().await? else {
        return Ok(());
    };

    if page.items.is_empty() {
        println!("No entries.");
        return Ok(());
    }
    for item in &page.items {
        println!("{:>6}  {}  {}", item.id, item.date, item.title);
    }
    println!();
    println!(
        "Page {} of {} ({} entries)",
        page.page + 1,
        page.total_pages(),
        page.total_count
    );
    Ok(())
}

async fn analyze(client: &MoodlogClient, id: &str, wait: bool) -> Result<()> {
    let entry_id = client.entry_view(id).analyze().await?;
    let screen = client.analysis(&entry_id);
    let response = if wait {
        screen.poll(POLL_INTERVAL, MAX_POLLS).await?
    } else {
        screen.load().await?
    };
    match response {
        Some(AnalysisResponse::Complete(result)) => print_analysis(&result),
        Some(AnalysisResponse::InProgress(progress)) => {
            print!("Analysis in progress: {:.0}%  {}", progress.progress, progress.message);
            match progress.estimated_remaining {
                Some(remaining) => println!(" (about {} left)", remaining),
                None => println!(),
            }
        }
        None => {}
    }
    Ok(())
}

fn print_status(state: &SessionState) {
    match state {
        SessionState::Authenticated {
            identity: Some(user),
        } => println!("Signed in as {} (id {}).", user.name, user.id),
        SessionState::Authenticated { identity: None } => {
            println!("Signed in, but the account could not be identified.")
        }
        SessionState::Unauthenticated | SessionState::Loading => println!("Not signed in."),
    }
}

fn print_outcome(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Created { entry_id } => {
            println!("Saved entry {}. Analysis started.", entry_id);
            println!("Check it with `moodlog analyze {} --wait`.", entry_id);
        }
        SubmitOutcome::Updated { entry_id } => println!("Updated entry {}.", entry_id),
    }
}

fn print_analysis(result: &AnalysisResult) {
    if let Some(status) = result.status {
        println!("Overall: {:?}", status);
    }
    for (label, value) in result.emotion_detection.pairs() {
        println!("  {:<9}{:>5.1}%", label, value);
    }
    let sections = [
        ("Summary", &result.emotion_summary),
        ("Automatic thought", &result.automatic_thought),
        ("Try asking yourself", &result.prompt_for_change),
        ("Another way to see it", &result.alternative_thought),
    ];
    for (heading, text) in sections {
        if !text.is_empty() {
            println!();
            println!("{}:", heading);
            println!("  {}", text);
        }
    }
}

/// Print the check result. True when the value is available.
fn report_check(check: crate::screens::FieldCheck) -> bool {
    match (check.available, check.error) {
        (Some(true), _) => true,
        (_, Some(error)) => {
            println!("{}", error);
            false
        }
        _ => {
            println!("Could not confirm availability. Try again.");
            false
        }
    }
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm(label: &str) -> io::Result<bool> {
    let answer = prompt(label)?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}
