//! Interactive terminal walk-through of the authentication and workspace
//! flows, with the platform authenticator replaced by the approving test
//! double. Point `ENCDEC_API_BASE` at a running backend first.

use std::error::Error;
use std::io::{self, BufRead, Write};

use encdec_client::{
    ApiClient, AuthFlow, FakeAuthenticator, GuardDecision, MemoryStore, OtpPhase, Panel, Route,
    SessionGuard, Workspace, logout,
};

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn show_errors(flow: &AuthFlow<FakeAuthenticator, MemoryStore>) {
    for (field, message) in flow.errors().snapshot() {
        println!("  {field}: {message}");
    }
}

async fn run_login(flow: &mut AuthFlow<FakeAuthenticator, MemoryStore>) -> io::Result<()> {
    flow.login_draft.email = prompt("Email")?;
    flow.login_draft.password = prompt("Password")?;
    flow.login_draft.otp = prompt("OTP from your authenticator app")?;
    if flow.submit_login().await.is_err() {
        show_errors(flow);
    }
    Ok(())
}

async fn run_register(flow: &mut AuthFlow<FakeAuthenticator, MemoryStore>) -> io::Result<()> {
    flow.switch_panel(Panel::Register);
    flow.register_draft.first_name = prompt("First name")?;
    flow.register_draft.last_name = prompt("Last name")?;
    flow.register_draft.email = prompt("Email")?;
    flow.register_draft.password = prompt("Password")?;
    flow.register_draft.confirm_password = prompt("Confirm password")?;
    match flow.submit_register().await {
        Ok(()) => {
            if let Some(qr_url) = flow.qr_url() {
                println!("Scan this in your authenticator app:\n  {qr_url}");
            }
        }
        Err(_) => show_errors(flow),
    }
    flow.go_back_to_login();
    Ok(())
}

async fn run_forgot_password(
    flow: &mut AuthFlow<FakeAuthenticator, MemoryStore>,
) -> io::Result<()> {
    flow.go_to_forgot();
    flow.reset_draft.email = prompt("Email")?;
    if flow.submit_forgot_password().await.is_err() {
        show_errors(flow);
        return Ok(());
    }
    println!(
        "OTP sent, valid for {} seconds.",
        flow.otp().remaining_seconds()
    );

    flow.reset_draft.otp = prompt("OTP from the email")?;
    if flow.submit_forgot_password().await.is_err() {
        show_errors(flow);
        return Ok(());
    }
    if flow.otp().phase() != OtpPhase::Verified {
        println!("OTP window elapsed, request a new code.");
        return Ok(());
    }

    flow.reset_draft.new_password = prompt("New password")?;
    flow.reset_draft.confirm_password = prompt("Confirm new password")?;
    match flow.submit_forgot_password().await {
        Ok(()) => println!("Password updated, sign in with the new one."),
        Err(_) => show_errors(flow),
    }
    Ok(())
}

async fn run_lost_authenticator(
    flow: &mut AuthFlow<FakeAuthenticator, MemoryStore>,
) -> io::Result<()> {
    flow.go_to_lost_auth();
    flow.lost_auth_draft.email = prompt("Email")?;
    if flow.submit_lost_authenticator().await.is_err() {
        show_errors(flow);
        return Ok(());
    }
    println!(
        "OTP sent, valid for {} seconds.",
        flow.otp().remaining_seconds()
    );

    flow.lost_auth_draft.otp = prompt("OTP from the email")?;
    match flow.submit_lost_authenticator().await {
        Ok(()) => {
            if let Some(qr_url) = flow.qr_url() {
                println!("Re-enroll your authenticator:\n  {qr_url}");
            }
        }
        Err(_) => show_errors(flow),
    }
    flow.go_back_to_login();
    Ok(())
}

async fn run_workspace(api: &ApiClient, store: &MemoryStore) -> io::Result<()> {
    let email = match SessionGuard::check(api).await {
        GuardDecision::Granted { email } => email,
        GuardDecision::Redirect => {
            println!("No valid session, sign in first.");
            return Ok(());
        }
    };
    let workspace = Workspace::new(api.clone(), email);
    match workspace.full_name().await {
        Ok(name) => println!("Welcome, {name}."),
        Err(err) => println!("Welcome. ({})", err.message()),
    }

    loop {
        println!("\n[1] Encrypt text  [2] Decrypt text  [3] Logout");
        match prompt("Choice")?.as_str() {
            "1" => {
                let text = prompt("Text to encrypt")?;
                match workspace.encrypt_text(&text).await {
                    Ok(encrypted) => println!("Encrypted:\n  {encrypted}"),
                    Err(err) => println!("Error: {}", err.message()),
                }
            }
            "2" => {
                let encrypted = prompt("Ciphertext to decrypt")?;
                match workspace.decrypt_text(&encrypted).await {
                    Ok(text) => println!("Decrypted:\n  {text}"),
                    Err(err) => println!("Error: {}", err.message()),
                }
            }
            "3" => {
                if let Err(err) = logout(api, store).await {
                    tracing::warn!("Logout request failed: {}", err);
                }
                println!("Signed out.");
                return Ok(());
            }
            other => println!("Unknown choice: {other}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let api = ApiClient::from_env()?;
    println!("Backend: {}", api.base_url());

    let mut flow = AuthFlow::new(api.clone(), FakeAuthenticator::approving(), MemoryStore::new());

    loop {
        println!("\n[1] Login  [2] Register  [3] Forgot password  [4] Lost authenticator  [q] Quit");
        match prompt("Choice")?.as_str() {
            "1" => {
                run_login(&mut flow).await?;
                if flow.route() == Route::Workspace {
                    run_workspace(&api, flow.store()).await?;
                    flow = AuthFlow::new(
                        api.clone(),
                        FakeAuthenticator::approving(),
                        MemoryStore::new(),
                    );
                }
            }
            "2" => run_register(&mut flow).await?,
            "3" => run_forgot_password(&mut flow).await?,
            "4" => run_lost_authenticator(&mut flow).await?,
            "q" => return Ok(()),
            other => println!("Unknown choice: {other}"),
        }
    }
}
