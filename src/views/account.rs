use super::{App, Outcome, print_json, render, show_info};
use crate::application_port::{ApiError, ApiResponse};
use crate::domain_model::User;
use crate::session::SessionState;

fn print_user(user: &User) {
    println!("{} ({:?})", user.display_name(), user.role);
    if let Some(email) = &user.email {
        let verified = if user.email_verified { "verified" } else { "unverified" };
        println!("  e-mail: {} ({})", email, verified);
    }
    if let Some(phone) = &user.phone_number {
        println!("  phone:  {}", phone);
    }
}

pub async fn login(app: &App, username: &str, password: &str) -> Outcome {
    let result = app.session.login(username, password).await;
    render(app.json, result, "Login failed", |user| {
        println!("Signed in as {}", user.display_name());
    })
}

pub async fn logout(app: &App) -> Outcome {
    let result = app.session.logout().await;
    render(app.json, result, "Could not clear stored tokens", |_| {
        println!("Signed out");
    })
}

pub async fn whoami(app: &App) -> Outcome {
    let session = app.session.initialize().await;
    match (session.state(), session.user) {
        (SessionState::Authenticated, Some(user)) => {
            render(app.json, Ok(user), "Could not load profile", print_user)
        }
        _ if app.json => {
            print_json(&ApiResponse::<User>::err(&ApiError::SessionExpired));
            Outcome::Failed
        }
        _ => {
            show_info("Not signed in (run `stayline login`)");
            Outcome::Failed
        }
    }
}

/// Gate for protected pages: restores the stored session and lets the page
/// run only if the profile confirms it.
pub async fn require_login(app: &App) -> bool {
    let session = app.session.initialize().await;
    if session.state() == SessionState::Authenticated {
        return true;
    }
    show_info("Please sign in first (run `stayline login`)");
    false
}
