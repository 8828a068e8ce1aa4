mod error;

use error::Error;
use rustyline::{error::ReadlineError, DefaultEditor};
use solver_engine::{Context, Expression, Transformation};
use solver_methods::{apply_method, get_method, methods, select_plans};
use std::io::{self, IsTerminal, Read};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

const HELP: &str = "\
commands:
  :var [x]                set or clear the variable being solved for
  :curriculum [name]      set or clear the curriculum
  :decimals on|off        prefer decimal results
  :gm on|off              skip the rewrites an interactive editor does itself
  :latex on|off           print expressions as LaTeX
  :method Category.Name   run only the given method
  :auto                   run every public method that applies
  :methods                list the registered methods
anything else is parsed as an expression";

/// The settings changed by REPL commands.
#[derive(Default)]
struct State {
    ctx: Context,
    method: Option<String>,
    latex: bool,
}

impl State {
    fn render(&self, expr: &Expression) -> String {
        if self.latex {
            expr.to_latex()
        } else {
            expr.to_string()
        }
    }
}

/// Parses `on` or `off`.
fn parse_switch(arg: Option<&str>) -> Option<bool> {
    match arg {
        Some("on") => Some(true),
        Some("off") => Some(false),
        _ => None,
    }
}

/// Applies a command to the state, printing its outcome.
fn run_command(command: &str, state: &mut State) -> Result<(), Error> {
    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next();
    match name {
        ":var" => state.ctx.solution_variable = arg.map(str::to_string),
        ":curriculum" => state.ctx.curriculum = arg.map(str::to_string),
        ":decimals" | ":gm" | ":latex" => {
            let Some(on) = parse_switch(arg) else {
                println!("usage: {} on|off", name);
                return Ok(());
            };
            match name {
                ":decimals" => state.ctx.prefer_decimals = on,
                ":gm" => state.ctx.gm_friendly = on,
                _ => state.latex = on,
            }
        },
        ":method" => match arg {
            Some(id) => state.method = Some(get_method(id)?.id.to_string()),
            None => println!("usage: :method Category.Name"),
        },
        ":auto" => state.method = None,
        ":methods" => {
            for entry in methods() {
                let marker = if entry.public { '*' } else { ' ' };
                println!("{} {:<50} {}", marker, entry.id, entry.description);
            }
        },
        _ => println!("{}", HELP),
    }
    debug!(?state.ctx, method = ?state.method, "settings");
    Ok(())
}

/// Prints a transformation and its steps and tasks, indented by depth.
fn print_transformation(step: &Transformation, state: &State, depth: usize) {
    let indent = "  ".repeat(depth);
    let explanation = step.explanation.as_ref().map(|e| e.key.to_string()).unwrap_or_default();
    println!(
        "{}{} => {}    {}",
        indent,
        state.render(&step.from_expr.expr),
        state.render(step.result()),
        explanation,
    );

    for sub_step in step.steps.iter().flatten() {
        print_transformation(sub_step, state, depth + 1);
    }
    for task in step.tasks.iter().flatten() {
        let explanation = task.explanation.as_ref().map(|e| e.key.to_string()).unwrap_or_default();
        println!("{}  task {}: {}    {}", indent, task.task_id, state.render(&task.start_expr), explanation);
        if !task.depends_on.is_empty() {
            println!("{}    uses {}", indent, task.depends_on.join(", "));
        }
        for sub_step in &task.steps {
            print_transformation(sub_step, state, depth + 2);
        }
    }
}

/// Parses the given input and runs the selected method, or every public method, on it.
fn solve(input: &str, state: &State) -> Result<(), Error> {
    let expr = input.parse::<Expression>()?;
    match &state.method {
        Some(id) => {
            let step = apply_method(id, &state.ctx, &expr)?;
            print_transformation(&step, state, 0);
        },
        None => {
            let selected = select_plans(&state.ctx, &expr);
            if selected.is_empty() {
                println!("no method applies to {}", state.render(&expr));
            }
            for (id, step) in selected {
                println!("{}:", id);
                print_transformation(&step, state, 1);
            }
        },
    }
    Ok(())
}

/// Processes one line of input, reporting any error.
fn process_input(input: &str, state: &mut State) {
    let input = input.trim();
    if input.is_empty() {
        return;
    }
    let result = if input.starts_with(':') {
        run_command(input, state)
    } else {
        solve(input, state)
    };
    if let Err(err) = result {
        err.report_to_stderr(input);
    }
}

fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut state = State::default();

    if !io::stdin().is_terminal() {
        // one expression or command per line
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            eprintln!("{}", err);
            return;
        }
        input.lines().for_each(|line| process_input(line, &mut state));
        return;
    }

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("{}", err);
            return;
        },
    };

    fn process_line(rl: &mut DefaultEditor, state: &mut State) -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        process_input(&input, state);
        Ok(())
    }

    loop {
        if let Err(err) = process_line(&mut rl, &mut state) {
            match err {
                ReadlineError::Eof | ReadlineError::Interrupted => (),
                _ => eprintln!("{}", err),
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_change_the_settings() {
        let mut state = State::default();
        process_input(":var x", &mut state);
        process_input(":decimals on", &mut state);
        process_input(":curriculum EU", &mut state);
        assert_eq!(state.ctx.solution_variable.as_deref(), Some("x"));
        assert!(state.ctx.prefer_decimals);
        assert_eq!(state.ctx.curriculum.as_deref(), Some("EU"));

        process_input(":decimals maybe", &mut state);
        assert!(state.ctx.prefer_decimals);

        process_input(":method General.SimplifyDoubleMinus", &mut state);
        assert_eq!(state.method.as_deref(), Some("General.SimplifyDoubleMinus"));
        process_input(":method General.Nothing", &mut state);
        assert_eq!(state.method.as_deref(), Some("General.SimplifyDoubleMinus"));
        process_input(":auto", &mut state);
        assert_eq!(state.method, None);
    }

    #[test]
    fn switches() {
        assert_eq!(parse_switch(Some("on")), Some(true));
        assert_eq!(parse_switch(Some("off")), Some(false));
        assert_eq!(parse_switch(None), None);
    }
}
