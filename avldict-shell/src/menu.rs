//! The interactive menu loop.

use std::io::{BufRead, Write};

use anyhow::Result;
use avldict_trees::{Dictionary, Hasher, Value, ValueKind};
use tracing::{info, warn};

use crate::input::{parse_value, Tokens};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuOption {
    HashKey,
    Insert,
    Search,
    Remove,
    Inorder,
    Fingerprint,
    ExportGraph,
    Quit,
}

impl MenuOption {
    const ALL: [MenuOption; 8] = [
        MenuOption::HashKey,
        MenuOption::Insert,
        MenuOption::Search,
        MenuOption::Remove,
        MenuOption::Inorder,
        MenuOption::Fingerprint,
        MenuOption::ExportGraph,
        MenuOption::Quit,
    ];

    fn number(self) -> u32 {
        match self {
            MenuOption::HashKey => 1,
            MenuOption::Insert => 2,
            MenuOption::Search => 3,
            MenuOption::Remove => 4,
            MenuOption::Inorder => 5,
            MenuOption::Fingerprint => 6,
            MenuOption::ExportGraph => 7,
            MenuOption::Quit => 0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MenuOption::HashKey => "Hash key",
            MenuOption::Insert => "Insert",
            MenuOption::Search => "Search",
            MenuOption::Remove => "Remove",
            MenuOption::Inorder => "Inorder",
            MenuOption::Fingerprint => "Fingerprint",
            MenuOption::ExportGraph => "Export graph",
            MenuOption::Quit => "Quit",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        let number = token.parse::<u32>().ok()?;
        MenuOption::ALL.into_iter().find(|option| option.number() == number)
    }
}

/// Reads commands from `R` and writes results to `W` until `0` or end of
/// input.
pub struct Shell<R, W> {
    tokens: Tokens<R>,
    out: W,
    dict: Dictionary,
    new_hash: fn() -> Box<dyn Hasher>,
    prompt: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(reader: R, out: W, dict: Dictionary, new_hash: fn() -> Box<dyn Hasher>, prompt: bool) -> Self {
        Shell {
            tokens: Tokens::new(reader),
            out,
            dict,
            new_hash,
            prompt,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        if self.prompt {
            writeln!(self.out, "Dictionary using AVL Tree.\n")?;
        }
        loop {
            self.show_menu()?;
            let token = match self.tokens.next_token()? {
                None => break,
                Some(token) => token,
            };
            let keep_going = match MenuOption::parse(&token) {
                Some(MenuOption::Quit) => false,
                Some(option) => self.dispatch(option)?,
                None => {
                    warn!(%token, "unknown menu option");
                    true
                }
            };
            if !keep_going {
                break;
            }
            writeln!(self.out)?;
        }
        info!(entries = self.dict.len(), "shell finished");
        self.out.flush()?;
        Ok(())
    }

    /// Runs one command. `false` means input ran out mid-command.
    fn dispatch(&mut self, option: MenuOption) -> Result<bool> {
        match option {
            MenuOption::HashKey => {
                let Some(key) = self.read_typed("Key type:")? else { return Ok(false) };
                writeln!(self.out, "  Hashed key: {}", key.digest())?;
            }
            MenuOption::Insert => {
                let Some(value) = self.read_typed("Object type:")? else { return Ok(false) };
                let Some(key) = self.read_typed("Key type:")? else { return Ok(false) };
                if let Err(err) = self.dict.insert(&key, value) {
                    warn!(%err, "insert failed");
                    writeln!(self.out, "  Insert failed: {}", err)?;
                }
            }
            MenuOption::Search => {
                let Some(key) = self.read_typed("Key type:")? else { return Ok(false) };
                match self.dict.search(&key)? {
                    None => writeln!(self.out, "Object does not exist.")?,
                    Some(value) => writeln!(self.out, "Object = {}", value)?,
                }
            }
            MenuOption::Remove => {
                let Some(key) = self.read_typed("Key type:")? else { return Ok(false) };
                self.dict.delete(&key)?;
            }
            MenuOption::Inorder => {
                for key in self.dict.traverse()? {
                    writeln!(self.out, "{}", key)?;
                }
            }
            MenuOption::Fingerprint => {
                let fingerprint = self.dict.fingerprint(self.new_hash)?;
                if fingerprint.is_empty() {
                    writeln!(self.out, "Fingerprint: empty")?;
                } else {
                    writeln!(self.out, "Fingerprint: {}", hex::encode(fingerprint))?;
                }
            }
            MenuOption::ExportGraph => {
                self.ask("  Path: ")?;
                let Some(path) = self.tokens.next_token()? else { return Ok(false) };
                let graph = self.dict.to_graphviz(self.new_hash)?;
                match graph.save_file(&path) {
                    Ok(()) => writeln!(self.out, "  Graph written to {}", path)?,
                    Err(err) => {
                        warn!(err = %format!("{:#}", err), "graph export failed");
                        writeln!(self.out, "  {:#}", err)?;
                    }
                }
            }
            MenuOption::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Asks for a type code, then a literal of that type. Unknown codes and
    /// unparsable literals ask again.
    fn read_typed(&mut self, title: &str) -> Result<Option<Value>> {
        let kind = loop {
            if self.prompt {
                writeln!(self.out, "  {}", title)?;
                for kind in ValueKind::ALL {
                    writeln!(self.out, "  {} - {}", kind.code(), kind.label())?;
                }
            }
            self.ask("  : ")?;
            let Some(code) = self.tokens.next_token()? else { return Ok(None) };
            let mut chars = code.chars();
            match (chars.next().and_then(ValueKind::from_code), chars.next()) {
                (Some(kind), None) => break kind,
                _ => warn!(%code, "unknown type code"),
            }
        };

        loop {
            self.ask("  : ")?;
            let Some(literal) = self.tokens.next_token()? else { return Ok(None) };
            match parse_value(kind, &literal) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => warn!(err = %format!("{:#}", err), "rejected literal"),
            }
        }
    }

    fn show_menu(&mut self) -> Result<()> {
        if !self.prompt {
            return Ok(());
        }
        for option in MenuOption::ALL {
            writeln!(self.out, "{} - {}", option.number(), option.label())?;
        }
        self.ask(": ")
    }

    fn ask(&mut self, text: &str) -> Result<()> {
        if self.prompt {
            write!(self.out, "{}", text)?;
            self.out.flush()?;
        }
        Ok(())
    }
}
