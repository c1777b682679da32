use snip_core::{Key, Store};
use snip_factory::KeyFactory;
use snip_generator::KeyGenerator;
use std::fmt::Write;
use thiserror::Error;
use tracing::warn;

pub const USAGE: &str = "\
commands:
  shorten <url>   store a url under a new key
  get <key>       print the url stored under a key
  lookup <url>    print every key stored for a url
  list            print every key and url
  count           print the number of stored urls
  clear           remove every stored url
  help            print this message
  quit            close the store and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Shorten(String),
    Get(String),
    Lookup(String),
    List,
    Count,
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("`{0}` expects an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` takes no argument")]
    UnexpectedArgument(&'static str),
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "shorten" => Self::Shorten(required("shorten", arg)?),
            "get" => Self::Get(required("get", arg)?),
            "lookup" => Self::Lookup(required("lookup", arg)?),
            "list" => no_argument("list", arg, Self::List)?,
            "count" => no_argument("count", arg, Self::Count)?,
            "clear" => no_argument("clear", arg, Self::Clear)?,
            "help" => no_argument("help", arg, Self::Help)?,
            "quit" | "exit" => no_argument("quit", arg, Self::Quit)?,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn required(name: &'static str, arg: &str) -> Result<String, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingArgument(name));
    }
    Ok(arg.to_string())
}

fn no_argument(name: &'static str, arg: &str, command: Command) -> Result<Command, ParseError> {
    if !arg.is_empty() {
        return Err(ParseError::UnexpectedArgument(name));
    }
    Ok(command)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Quit,
}

/// Executes shell commands against a key factory and its store.
pub struct Shell<S, G> {
    factory: KeyFactory<S, G>,
    base_url: String,
}

impl<S: Store, G: KeyGenerator> Shell<S, G> {
    pub fn new(factory: KeyFactory<S, G>, base_url: impl Into<String>) -> Self {
        Self {
            factory,
            base_url: base_url.into(),
        }
    }

    /// Runs one command. Failures are reported in the reply; only `quit`
    /// ends the shell.
    pub async fn execute(&self, command: Command) -> Outcome {
        match self.run(command).await {
            Ok(Some(reply)) => Outcome::Reply(reply),
            Ok(None) => Outcome::Quit,
            Err(err) => {
                warn!(error = %err, "command failed");
                Outcome::Reply(format!("error: {err:#}"))
            }
        }
    }

    async fn run(&self, command: Command) -> anyhow::Result<Option<String>> {
        let store = self.factory.store();

        let reply = match command {
            Command::Shorten(url) => {
                let key = self.factory.shorten(&url).await?;
                format!("{} {}", key, key.to_url(&self.base_url))
            }
            Command::Get(key) => {
                let key = Key::new(key)?;
                match store.get(&key).await? {
                    Some(url) => url,
                    None => format!("short url for key '{}' not found", key),
                }
            }
            Command::Lookup(url) => {
                let keys = store.get_by_value(&url).await?;
                if keys.is_empty() {
                    format!("no keys for {}", url)
                } else {
                    keys.iter()
                        .map(Key::as_str)
                        .collect::<Vec<_>>()
                        .join(" ")
                }
            }
            Command::List => {
                let entries = store.get_all().await?;
                let mut reply = String::new();
                for (key, url) in &entries {
                    writeln!(reply, "{} {}", key, url)?;
                }
                write!(reply, "{} urls", entries.len())?;
                reply
            }
            Command::Count => store.len().await?.to_string(),
            Command::Clear => {
                store.clear().await?;
                "cleared".to_string()
            }
            Command::Help => USAGE.to_string(),
            Command::Quit => return Ok(None),
        };

        Ok(Some(reply))
    }
}
