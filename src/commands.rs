use std::rc::Rc;

use crate::{
    diagnostics::{CallaError, Diagnostic, DiagnosticKind, Result},
    registry::{CommandRegistry, NativeCommand},
};

/// Registers the built-in commands into a fresh registry. These are sample
/// registrations; the engine itself works against an open set of commands.
pub fn install(registry: &mut CommandRegistry) {
    registry.register(Rc::new(NativeCommand {
        name: "echo",
        aliases: &["print"],
        // echo writes its own output; the driver must not print it again.
        suppresses_output: true,
        callback: cmd_echo,
    }));
    registry.register(Rc::new(NativeCommand {
        name: "greet",
        aliases: &[],
        suppresses_output: false,
        callback: cmd_greet,
    }));
}

fn ensure_exact(args: &[String], expected: usize, name: &str) -> Result<()> {
    if args.len() != expected {
        return Err(CallaError::from(Diagnostic::new(
            DiagnosticKind::Runtime,
            format!(
                "`{name}` expected {expected} arguments but received {}",
                args.len()
            ),
        )));
    }
    Ok(())
}

/// Prints the space-joined arguments on stdout. The joined string is still
/// returned so that `var x = echo(...)` captures it.
fn cmd_echo(args: &[String]) -> Result<Option<String>> {
    let joined = args.join(" ");
    println!("{joined}");
    Ok(Some(joined))
}

fn cmd_greet(args: &[String]) -> Result<Option<String>> {
    ensure_exact(args, 1, "greet")?;
    Ok(Some(format!("Hello {}!", args[0])))
}
