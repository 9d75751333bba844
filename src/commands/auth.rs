use std::path::PathBuf;
use std::time::Duration;

use crate::client::{ApiClient, Credentials, Endpoints};
use crate::error::Result;
use crate::session::{AuthState, SessionStore};

pub struct LoginOptions {
    pub username: String,
    pub password: String,
    pub endpoints: Endpoints,
    pub timeout: Option<Duration>,
    pub session_path: PathBuf,
}

pub fn run_login(options: &LoginOptions) -> Result<()> {
    let store = SessionStore::new(&options.session_path);
    let state = store.load()?;

    let client = ApiClient::new(options.endpoints.clone(), options.timeout);
    let session = client.login(&Credentials {
        username: options.username.clone(),
        password: options.password.clone(),
    })?;

    println!("Logged in as {} ({})", session.username, session.role);
    store.save(&state.login(session))
}

pub fn run_logout(session_path: PathBuf) -> Result<()> {
    let store = SessionStore::new(session_path);
    let state = store.load()?;
    match state.session() {
        Some(session) => println!("Logged out {}", session.username),
        None => println!("Not logged in"),
    }
    store.save(&state.logout())
}

pub fn run_whoami(session_path: PathBuf) -> Result<()> {
    match SessionStore::new(session_path).load()? {
        AuthState::Authenticated(session) => {
            println!("username={}", session.username);
            println!("role={}", session.role);
        }
        AuthState::Unauthenticated => println!("Not logged in"),
    }
    Ok(())
}
