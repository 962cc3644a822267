use std::rc::Rc;

use indexmap::IndexMap;

use crate::diagnostics::Result;

/// A registered command. Implementations are looked up by name (or alias)
/// and invoked synchronously with the fully expanded argument list.
pub trait Command {
    fn name(&self) -> &str;

    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// When true, the session driver never prints the command's returned
    /// result: the command produces its own output. The result remains
    /// available to assignment statements.
    fn suppresses_output(&self) -> bool {
        false
    }

    /// Runs the command. `Ok(None)` means the command produced no result.
    fn execute(&self, args: &[String]) -> Result<Option<String>>;
}

/// Plain fn-pointer command, enough for built-ins and most tests.
pub struct NativeCommand {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub suppresses_output: bool,
    pub callback: fn(&[String]) -> Result<Option<String>>,
}

impl Command for NativeCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn aliases(&self) -> &[&str] {
        self.aliases
    }

    fn suppresses_output(&self) -> bool {
        self.suppresses_output
    }

    fn execute(&self, args: &[String]) -> Result<Option<String>> {
        (self.callback)(args)
    }
}

/// Flat mapping from command name (and every alias) to the command.
/// Registration collisions silently overwrite: last registration wins.
#[derive(Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Rc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the command under its name and all aliases. A command without a
    /// name is reported and skipped; the session keeps running.
    pub fn register(&mut self, command: Rc<dyn Command>) {
        let name = command.name();
        if name.is_empty() {
            eprintln!("cannot register a command without a name");
            return;
        }
        self.commands.insert(name.to_string(), Rc::clone(&command));
        for alias in command.aliases() {
            self.commands
                .insert((*alias).to_string(), Rc::clone(&command));
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Rc<dyn Command>> {
        self.commands.get(name).cloned()
    }
}
