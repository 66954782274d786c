//! Parsing of the line commands typed at the prompt.

use anyhow::{bail, Context, Result};
use bridge_core::FormData;

pub const HELP: &str = "\
commands:
  go <path>               navigate, asking first if a form is dirty
  go! <path>              navigate without asking
  submit <path> [k=v...]  post form data
  replace <path>          rewrite the current frame's path
  refresh                 re-fetch the current frame in place
  back | forward          move through history
  dirty | clean           mark the form as edited / saved
  confirm | stay          answer the leave-page prompt
  show                    print the current frame
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go { path: String, force: bool },
    Submit { path: String, data: FormData },
    Replace { path: String },
    Refresh,
    Back,
    Forward,
    Dirty,
    Clean,
    Confirm,
    Stay,
    Show,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };

        let cmd = match head {
            "go" | "go!" => Command::Go {
                path: path_arg(words.next(), head)?,
                force: head == "go!",
            },
            "submit" => {
                let path = path_arg(words.next(), head)?;
                let mut data = FormData::new();
                for field in words.by_ref() {
                    let (key, value) = field
                        .split_once('=')
                        .with_context(|| format!("expected key=value, got `{field}`"))?;
                    data.append(key, value);
                }
                Command::Submit { path, data }
            }
            "replace" => Command::Replace {
                path: path_arg(words.next(), head)?,
            },
            "refresh" => Command::Refresh,
            "back" => Command::Back,
            "forward" => Command::Forward,
            "dirty" => Command::Dirty,
            "clean" => Command::Clean,
            "confirm" => Command::Confirm,
            "stay" => Command::Stay,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command `{other}` (try `help`)"),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected argument `{extra}`");
        }
        Ok(Some(cmd))
    }
}

fn path_arg(word: Option<&str>, cmd: &str) -> Result<String> {
    word.map(str::to_string)
        .with_context(|| format!("`{cmd}` needs a path"))
}
