//! Account command handlers.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clausewise_core::config::Config;
use clausewise_core::{AuthGateway, AuthResult, FileSessionStore, SessionStore};

fn gateway(config: &Config) -> Result<AuthGateway> {
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open_default());
    AuthGateway::from_config(config, store)
}

pub async fn signup(config: &Config, name: &str, email: &str, password: &str) -> Result<()> {
    match gateway(config)?.signup(name, email, password).await {
        AuthResult::Success { message, .. } => {
            println!("{message}");
            println!("Run `clausewise login --email {email}` to sign in.");
            Ok(())
        }
        AuthResult::Failure { message } => bail!(message),
    }
}

pub async fn login(config: &Config, email: &str, password: &str) -> Result<()> {
    match gateway(config)?.login(email, password).await {
        AuthResult::Success { identity, message } => {
            println!("{message}");
            println!("Logged in as {} <{}>", identity.name, identity.email);
            Ok(())
        }
        AuthResult::Failure { message } => bail!(message),
    }
}

pub fn logout() -> Result<()> {
    let store = FileSessionStore::open_default();
    store
        .clear()
        .with_context(|| format!("remove session at {}", store.path().display()))?;
    println!("Logged out");
    Ok(())
}

pub fn whoami() {
    match FileSessionStore::open_default().get() {
        Some(identity) => println!("{} <{}>", identity.name, identity.email),
        None => println!("Not logged in"),
    }
}
