//! Command-line interface implementation.

use crate::error::{PassError, Result};
use crate::generator::{self, GeneratorOptions};
use crate::models::Credential;
use crate::store::CredentialStore;
use crate::strength;
use crate::utils::{self, success, warning};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use std::path::PathBuf;

/// Local credential store with password generation and strength scoring.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage directory
    #[arg(
        short = 'd',
        long,
        global = true,
        env = "SECUREPASS_DIR",
        help = "Storage directory (default: platform data dir)"
    )]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the storage directories
    Init,

    /// Add a new credential
    Add {
        /// Title of the entry (prompted if omitted)
        #[arg(short, long)]
        title: Option<String>,

        /// Username or email (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Generate the password instead of prompting for one
        #[arg(short = 'g', long)]
        generate: bool,

        /// Optional notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List stored credentials
    List {
        /// Reveal passwords instead of masking them
        #[arg(short, long)]
        show: bool,
    },

    /// Delete a credential by id
    Delete {
        /// Credential id (see `list`)
        id: String,
    },

    /// Delete every stored credential
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate random passwords
    Generate {
        /// Password length
        #[arg(short, long, default_value = "16")]
        length: usize,

        /// Exclude uppercase letters
        #[arg(long)]
        no_uppercase: bool,

        /// Exclude lowercase letters
        #[arg(long)]
        no_lowercase: bool,

        /// Exclude digits
        #[arg(long)]
        no_digits: bool,

        /// Exclude symbols
        #[arg(long)]
        no_symbols: bool,

        /// How many passwords to print
        #[arg(short, long, default_value = "1")]
        count: usize,
    },

    /// Score a password's strength
    Strength {
        /// Password to score (prompted if omitted)
        password: Option<String>,
    },
}

impl Cli {
    /// Resolve the storage root.
    pub fn storage_root(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(utils::default_storage_root)
    }

    /// Execute the CLI command.
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Init => self.init_storage().await,
            Commands::Add {
                title,
                username,
                generate,
                notes,
            } => {
                self.add_credential(title.clone(), username.clone(), *generate, notes.clone())
                    .await
            }
            Commands::List { show } => self.list_credentials(*show).await,
            Commands::Delete { id } => self.delete_credential(id).await,
            Commands::Clear { yes } => self.clear_credentials(*yes).await,
            Commands::Generate {
                length,
                no_uppercase,
                no_lowercase,
                no_digits,
                no_symbols,
                count,
            } => self.generate_passwords(
                GeneratorOptions {
                    length: *length,
                    uppercase: !no_uppercase,
                    lowercase: !no_lowercase,
                    digits: !no_digits,
                    symbols: !no_symbols,
                },
                *count,
            ),
            Commands::Strength { password } => self.score_password(password.clone()),
        }
    }

    /// Open the store, prompting for the master password first. Nothing
    /// is read from storage before the password is supplied.
    fn open_store(&self) -> Result<CredentialStore> {
        let master = self.master_password("Master password")?;
        Ok(CredentialStore::open_at(&self.storage_root(), master))
    }

    fn master_password(&self, prompt: &str) -> Result<String> {
        if let Ok(password) = std::env::var("SECUREPASS_PASSWORD") {
            return Ok(password);
        }
        let password = Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| PassError::Other(e.to_string()))?;
        if password.is_empty() {
            return Err(PassError::Cancelled);
        }
        Ok(password)
    }

    async fn init_storage(&self) -> Result<()> {
        let root = self.storage_root();
        std::fs::create_dir_all(root.join("primary"))?;
        std::fs::create_dir_all(root.join("fallback"))?;

        let store = self.open_store()?;
        store.init().await?;

        success(&format!("Storage initialized at {}", root.display()));
        Ok(())
    }

    async fn add_credential(
        &self,
        title: Option<String>,
        username: Option<String>,
        generate: bool,
        notes: Option<String>,
    ) -> Result<()> {
        let store = self.open_store()?;

        let title = match title {
            Some(t) => t,
            None => prompt_input("Title")?,
        };
        let username = match username {
            Some(u) => u,
            None => prompt_input("Username or email")?,
        };

        let password = if generate {
            let password = generator::generate(&GeneratorOptions::default());
            println!("Generated password: {}", password.bold());
            password
        } else {
            Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|e| PassError::Other(e.to_string()))?
        };

        let credential = Credential::new(title, username, password, notes);
        credential.validate()?;

        let report = strength::evaluate(&credential.password);
        println!("Strength: {}", colored_label(&report));
        if report.score <= 1 {
            warning("This password is weak. Consider `add --generate`.");
        }

        store.save(credential.clone()).await?;
        success(&format!("Saved credential '{}' ({})", credential.title, credential.id));
        Ok(())
    }

    async fn list_credentials(&self, show: bool) -> Result<()> {
        let store = self.open_store()?;
        let collection = store.get_all().await;

        if collection.is_empty() {
            println!("No credentials stored.");
            return Ok(());
        }

        for credential in &collection {
            let password = if show {
                credential.password.clone()
            } else {
                "*".repeat(credential.password.len())
            };
            println!(
                "{}  {}  {}  {}  {}",
                credential.id.dimmed(),
                credential.title.bold(),
                credential.username,
                password,
                credential.created_at.dimmed(),
            );
            if let Some(notes) = &credential.notes {
                println!("    {}", notes.dimmed());
            }
        }
        println!("{} credential(s)", collection.len());
        Ok(())
    }

    async fn delete_credential(&self, id: &str) -> Result<()> {
        let store = self.open_store()?;

        // The store treats a missing id as a no-op; surface it here so
        // typos don't report success.
        if !store.get_all().await.iter().any(|c| c.id == id) {
            return Err(PassError::CredentialNotFound(id.to_string()));
        }

        store.delete(id).await?;
        success(&format!("Deleted credential {id}"));
        Ok(())
    }

    async fn clear_credentials(&self, yes: bool) -> Result<()> {
        if !yes {
            let confirmed = Confirm::new()
                .with_prompt("Delete ALL stored credentials?")
                .default(false)
                .interact()
                .map_err(|e| PassError::Other(e.to_string()))?;
            if !confirmed {
                return Err(PassError::Cancelled);
            }
        }

        let store = self.open_store()?;
        store.clear_all().await?;
        success("All credentials cleared");
        Ok(())
    }

    fn generate_passwords(&self, options: GeneratorOptions, count: usize) -> Result<()> {
        for _ in 0..count {
            let password = generator::generate(&options);
            let report = strength::evaluate(&password);
            println!("{}  {}", password, colored_label(&report));
        }
        Ok(())
    }

    fn score_password(&self, password: Option<String>) -> Result<()> {
        let password = match password {
            Some(p) => p,
            None => Password::new()
                .with_prompt("Password to score")
                .allow_empty_password(true)
                .interact()
                .map_err(|e| PassError::Other(e.to_string()))?,
        };

        let report = strength::evaluate(&password);
        println!("Score: {}/5  {}", report.score, colored_label(&report));
        Ok(())
    }
}

fn prompt_input(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| PassError::Other(e.to_string()))
}

fn colored_label(report: &strength::StrengthReport) -> ColoredString {
    match report.score {
        0 | 1 => report.label.red(),
        2 | 3 => report.label.yellow(),
        _ => report.label.green(),
    }
}
