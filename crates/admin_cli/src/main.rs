use std::{error::Error, io::Write};

use api_types::user::UserNew;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Actor, Engine, RoleName};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use validator::Validate;

#[derive(Parser, Debug)]
#[command(name = "flour_mill_admin")]
#[command(about = "Admin utilities for the flour mill back-end (bootstrap users)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./flour_mill.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Creates a user, prompting for the password.
    Create(UserCreateArgs),
    /// Replaces the password of an existing user.
    Password(UserPasswordArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    /// One of SUPER_ADMIN_ROLE, ADMIN_ROLE, EDITOR_ROLE, SALES_ROLE.
    #[arg(long, default_value = "SUPER_ADMIN_ROLE", value_parser = parse_role)]
    role: RoleName,
}

#[derive(Args, Debug)]
struct UserPasswordArgs {
    #[arg(long)]
    email: String,
}

fn parse_role(raw: &str) -> Result<RoleName, String> {
    RoleName::try_from(raw).map_err(|err| err.to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;
    let actor = Actor::system();

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;
            let input = UserNew {
                name: args.name,
                email: args.email,
                phone: args.phone,
                password,
                role_name: Some(args.role.into()),
            };
            if let Err(err) = input.validate() {
                eprintln!("invalid user: {err}");
                std::process::exit(2);
            }

            match engine.new_user(&input, &actor).await {
                Ok(user) => println!("created user: {} ({})", user.email, user.audit.id),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Command::User(User {
            command: UserCommand::Password(args),
        }) => {
            let password = prompt_password_twice()?;
            if let Err(err) = engine.set_user_password(&args.email, &password, &actor).await {
                eprintln!("{err}");
                std::process::exit(1);
            }
            println!("password updated: {}", args.email);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_user_create() {
        let cli = Cli::try_parse_from([
            "flour_mill_admin",
            "--database-url",
            "sqlite::memory:",
            "user",
            "create",
            "--name",
            "Owner",
            "--email",
            "owner@mill.test",
            "--role",
            "ADMIN_ROLE",
        ])
        .unwrap();
        let Command::User(User {
            command: UserCommand::Create(args),
        }) = cli.command
        else {
            panic!("expected user create");
        };
        assert_eq!(args.role, RoleName::Admin);
        assert_eq!(args.phone, None);
    }

    #[test]
    fn cli_rejects_unknown_role() {
        let result = Cli::try_parse_from([
            "flour_mill_admin",
            "user",
            "create",
            "--name",
            "Owner",
            "--email",
            "owner@mill.test",
            "--role",
            "ROOT",
        ]);
        assert!(result.is_err());
    }
}
