//! `whs run` command - execute a session script
//!
//! Each non-blank line is one command; lines starting with `#` are comments.
//!
//! ```text
//! register alice secret
//! add detail --name Bolt --manufacturer ACME --year 2020 --price 0.5 --material steel
//! add assembly --name Shaft --manufacturer ACME --details @1
//! search sh
//! ```

use clap::{Parser, Subcommand};
use console::style;
use miette::{Diagnostic, IntoDiagnostic, Result, WrapErr};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::cli::helpers::{format_alias, split_args};
use crate::cli::output::{
    effective_format, render_product, render_rows, render_stock, render_summary, render_tree, rows,
};
use crate::cli::session::Session;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::input::require_text;
use crate::core::{
    AuthError, Config, InputError, ProductForm, ProductKind, Warehouse, WarehouseError,
};
use crate::entities::Detail;

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Script file ("-" reads stdin)
    pub file: PathBuf,

    /// Report every failing line instead of stopping at the first
    #[arg(long, short = 'k')]
    pub keep_going: bool,
}

/// A failure while executing one script command
#[derive(Debug, Error, Diagnostic)]
pub enum CommandError {
    #[error("{0}")]
    #[diagnostic(code(whs::script::parse))]
    Parse(String),

    #[error("not logged in")]
    #[diagnostic(
        code(whs::script::not_logged_in),
        help("start the script with `register` or `login`")
    )]
    NotLoggedIn,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error("failed to render output: {0}")]
    #[diagnostic(code(whs::script::output))]
    Output(String),

    #[error(transparent)]
    #[diagnostic(code(whs::script::io))]
    Io(#[from] io::Error),
}

/// A command failure tagged with its script line
#[derive(Debug, Error, Diagnostic)]
#[error("line {line}: {error}")]
#[diagnostic(code(whs::script::failed))]
pub struct ScriptError {
    pub line: usize,
    pub error: CommandError,
    #[help]
    help: Option<String>,
}

impl ScriptError {
    fn new(line: usize, error: CommandError) -> Self {
        let help = error.help().map(|h| h.to_string());
        Self { line, error, help }
    }
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ScriptLine {
    #[command(subcommand)]
    command: ScriptCommand,
}

#[derive(Subcommand, Debug)]
enum ScriptCommand {
    /// Register a new warehouse and log in
    Register { login: String, password: String },

    /// Log in to an existing warehouse
    Login { login: String, password: String },

    /// End the current session
    Logout,

    /// Add an item to stock
    #[command(subcommand)]
    Add(AddCommand),

    /// Sell (remove) items
    Sell {
        #[arg(required = true)]
        references: Vec<String>,
    },

    /// Search items by name
    Search {
        /// Case-insensitive name fragment (empty matches all)
        #[arg(default_value = "")]
        query: String,

        #[arg(long)]
        kind: Option<ProductKind>,
    },

    /// List everything in stock
    Stock {
        #[arg(long)]
        kind: Option<ProductKind>,
    },

    /// Describe one item
    Show { reference: String },

    /// Show an item and its components as a tree
    Tree { reference: String },

    /// Per-kind counts and total value
    Summary,
}

#[derive(Subcommand, Debug)]
enum AddCommand {
    /// Buy a detail
    Detail {
        #[command(flatten)]
        info: InfoArgs,

        #[arg(long)]
        material: String,
    },

    /// Build an assembly from in-stock details
    Assembly {
        #[command(flatten)]
        info: InfoArgs,

        /// Details to consume (comma-separated references)
        #[arg(long, value_delimiter = ',')]
        details: Vec<String>,
    },

    /// Build a mechanism from in-stock assemblies
    Mechanism {
        #[command(flatten)]
        info: InfoArgs,

        /// Assemblies to consume (comma-separated references)
        #[arg(long, value_delimiter = ',')]
        assemblies: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct InfoArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    manufacturer: String,

    /// Blank uses the configured default
    #[arg(long, default_value = "")]
    year: String,

    /// Blank uses the configured default
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    price: String,
}

impl From<InfoArgs> for ProductForm {
    fn from(args: InfoArgs) -> Self {
        ProductForm {
            name: args.name,
            manufacturer: args.manufacturer,
            year: args.year,
            price: args.price,
        }
    }
}

/// Executes script lines against a session, writing results to `out`
pub struct ScriptRunner<W: Write> {
    session: Session,
    format: OutputFormat,
    quiet: bool,
    out: W,
}

impl<W: Write> ScriptRunner<W> {
    pub fn new(session: Session, format: OutputFormat, quiet: bool, out: W) -> Self {
        Self {
            session,
            format,
            quiet,
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run a whole script
    ///
    /// Stops at the first failure unless `keep_going` is set; returns
    /// every failure encountered.
    pub fn run_script(&mut self, script: &str, keep_going: bool) -> Vec<ScriptError> {
        let mut failures = Vec::new();
        for (index, line) in script.lines().enumerate() {
            if let Err(error) = self.run_line(line) {
                failures.push(ScriptError::new(index + 1, error));
                if !keep_going {
                    break;
                }
            }
        }
        failures
    }

    /// Run one line; blank lines and comments do nothing
    pub fn run_line(&mut self, line: &str) -> Result<(), CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }
        debug!(command = trimmed, "running script line");

        let args = split_args(trimmed).map_err(CommandError::Parse)?;
        let parsed = match ScriptLine::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(e) if e.kind() == clap::error::ErrorKind::DisplayHelp => {
                write!(self.out, "{}", e.render())?;
                return Ok(());
            }
            Err(e) => return Err(CommandError::Parse(clap_message(&e))),
        };
        self.execute(parsed.command)
    }

    fn execute(&mut self, command: ScriptCommand) -> Result<(), CommandError> {
        match command {
            ScriptCommand::Register { login, password } => {
                let name = self.session.register(&login, &password)?.name().to_string();
                self.success(format!("Registered warehouse '{}'", name))
            }
            ScriptCommand::Login { login, password } => {
                let name = self.session.login(&login, &password)?.name().to_string();
                self.success(format!("Logged in as '{}'", name))
            }
            ScriptCommand::Logout => match self.session.logout() {
                Some(login) => self.success(format!("Logged out '{}'", login)),
                None => Err(CommandError::NotLoggedIn),
            },
            ScriptCommand::Add(add) => self.add(add),
            ScriptCommand::Sell { references } => {
                let warehouse = self.warehouse_mut()?;
                let ids = warehouse.resolve_all(references.as_slice())?;
                let sold = warehouse.sell_many(&ids).len();
                self.success(format!("Removed {} item(s)", sold))
            }
            ScriptCommand::Search { query, kind } => {
                let format = self.format;
                let text = {
                    let warehouse = self.warehouse()?;
                    let found = warehouse.search(kind, &query);
                    if found.is_empty() {
                        None
                    } else {
                        Some(render(render_rows(&rows(found, warehouse), format))?)
                    }
                };
                match text {
                    Some(text) => self.emit(&text),
                    None if query.is_empty() => self.note("No items in stock."),
                    None => self.note(&format!("No items found for '{}'.", query)),
                }
            }
            ScriptCommand::Stock { kind } => {
                let format = self.format;
                let text = render(render_stock(self.warehouse()?, kind, format))?;
                self.emit(&text)
            }
            ScriptCommand::Show { reference } => {
                let format = self.format;
                let text = {
                    let warehouse = self.warehouse()?;
                    let id = warehouse.resolve(&reference)?;
                    match warehouse.get(&id) {
                        Some(product) => render(render_product(product, format))?,
                        None => return Err(WarehouseError::UnknownReference(reference).into()),
                    }
                };
                self.emit(&text)
            }
            ScriptCommand::Tree { reference } => {
                let text = {
                    let warehouse = self.warehouse()?;
                    let id = warehouse.resolve(&reference)?;
                    match warehouse.get(&id) {
                        Some(product) => render_tree(product, warehouse.short_id(&id)),
                        None => return Err(WarehouseError::UnknownReference(reference).into()),
                    }
                };
                self.emit(&text)
            }
            ScriptCommand::Summary => {
                let format = self.format;
                let text = render(render_summary(&self.warehouse()?.summary(), format))?;
                self.emit(&text)
            }
        }
    }

    fn add(&mut self, add: AddCommand) -> Result<(), CommandError> {
        let default_year = self.session.config().default_year();
        let default_price = self.session.config().default_price();

        let (kind, id, alias, name) = {
            let warehouse = self.warehouse_mut()?;
            let id = match add {
                AddCommand::Detail { info, material } => {
                    let info = ProductForm::from(info).into_info(default_year, default_price)?;
                    let material = require_text("material", &material)?;
                    warehouse.buy(Detail::new(info, material))
                }
                AddCommand::Assembly { info, details } => {
                    let info = ProductForm::from(info).into_info(default_year, default_price)?;
                    let ids = warehouse.resolve_all(details.as_slice())?;
                    warehouse.assemble(info, &ids)?
                }
                AddCommand::Mechanism { info, assemblies } => {
                    let info = ProductForm::from(info).into_info(default_year, default_price)?;
                    let ids = warehouse.resolve_all(assemblies.as_slice())?;
                    warehouse.build_mechanism(info, &ids)?
                }
            };
            let name = warehouse
                .get(&id)
                .map(|p| p.name().to_string())
                .unwrap_or_default();
            (id.kind(), id, warehouse.short_id(&id), name)
        };

        debug!(%id, "added item from script");
        self.success(format!(
            "Added {} {} {}",
            kind.label(),
            style(format_alias(alias)).cyan(),
            name
        ))
    }

    fn warehouse(&self) -> Result<&Warehouse, CommandError> {
        self.session.warehouse().ok_or(CommandError::NotLoggedIn)
    }

    fn warehouse_mut(&mut self) -> Result<&mut Warehouse, CommandError> {
        self.session.warehouse_mut().ok_or(CommandError::NotLoggedIn)
    }

    fn success(&mut self, message: String) -> Result<(), CommandError> {
        if !self.quiet {
            writeln!(self.out, "{} {}", style("✓").green(), message)?;
        }
        Ok(())
    }

    fn note(&mut self, message: &str) -> Result<(), CommandError> {
        writeln!(self.out, "{}", style(message).dim())?;
        Ok(())
    }

    fn emit(&mut self, text: &str) -> Result<(), CommandError> {
        write!(self.out, "{}", text)?;
        Ok(())
    }
}

fn render(result: Result<String>) -> Result<String, CommandError> {
    result.map_err(|e| CommandError::Output(e.to_string()))
}

/// First line of a clap error without its `error: ` prefix
fn clap_message(error: &clap::Error) -> String {
    let rendered = error.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}

pub fn run(args: RunArgs, global: &GlobalOpts, config: Config) -> Result<()> {
    let script = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).into_diagnostic()?;
        buf
    } else {
        std::fs::read_to_string(&args.file)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read script {}", args.file.display()))?
    };

    let format = effective_format(global, &config);
    let mut runner = ScriptRunner::new(Session::new(config), format, global.quiet, io::stdout());
    let mut failures = runner.run_script(&script, args.keep_going);

    if !args.keep_going {
        return match failures.pop() {
            Some(failure) => Err(failure.into()),
            None => Ok(()),
        };
    }

    if failures.is_empty() {
        return Ok(());
    }
    let count = failures.len();
    for failure in failures {
        eprintln!("{:?}", miette::Report::new(failure));
    }
    Err(miette::miette!("{} script line(s) failed", count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> ScriptRunner<Vec<u8>> {
        console::set_colors_enabled(false);
        ScriptRunner::new(
            Session::new(Config::default()),
            OutputFormat::Tsv,
            false,
            Vec::new(),
        )
    }

    fn output(runner: ScriptRunner<Vec<u8>>) -> String {
        String::from_utf8(runner.into_output()).unwrap()
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let mut r = runner();
        assert!(r.run_script("\n# nothing here\n   \n", false).is_empty());
        assert_eq!(output(r), "");
    }

    #[test]
    fn test_register_buy_search_sell() {
        let mut r = runner();
        let script = r#"
register alice pw1
add detail --name Bolt --manufacturer ACME --year 2020 --price 0.5 --material steel
search bo
sell @1
search bo
"#;
        assert!(r.run_script(script, false).is_empty());
        let out = output(r);
        assert!(out.contains("✓ Registered warehouse 'alice'"));
        assert!(out.contains("✓ Added Detail @1 Bolt"));
        assert!(out.contains("@1\tDetail\tBolt\tACME\t2020\t0.5\tsteel"));
        assert!(out.contains("✓ Removed 1 item(s)"));
        assert!(out.contains("No items found for 'bo'."));
    }

    #[test]
    fn test_inventory_requires_login() {
        let mut r = runner();
        let failures = r.run_script("stock\n", false);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].line, 1);
        assert!(matches!(failures[0].error, CommandError::NotLoggedIn));
        assert!(failures[0].help.as_deref().unwrap().contains("register"));
    }

    #[test]
    fn test_first_failure_stops() {
        let mut r = runner();
        let failures = r.run_script("register a b\nregister a c\nsummary\nlogin x y\n", false);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].line, 2);
        assert!(matches!(
            failures[0].error,
            CommandError::Auth(AuthError::DuplicateLogin(_))
        ));
        assert!(!output(r).contains("Warehouse a"));
    }

    #[test]
    fn test_keep_going_collects_failures() {
        let mut r = runner();
        let failures = r.run_script("register a b\nlogin a nope\nsell @9\nsummary\n", true);
        let lines: Vec<usize> = failures.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![2, 3]);
        assert!(output(r).contains("Warehouse a"));
    }

    #[test]
    fn test_assembly_consumes_details() {
        let mut r = runner();
        let script = r#"
register alice pw1
add detail --name Bolt --manufacturer ACME --material steel
add detail --name Nut --manufacturer ACME --material brass
add assembly --name Shaft --manufacturer ACME --price 5 --details @1,@2
"#;
        assert!(r.run_script(script, false).is_empty());
        let warehouse = r.session().warehouse().unwrap();
        assert_eq!(warehouse.count(ProductKind::Detail), 0);
        assert_eq!(warehouse.count(ProductKind::Assembly), 1);

        let failures = r.run_script("add assembly --name Again --manufacturer ACME --details @1", false);
        assert!(matches!(
            failures[0].error,
            CommandError::Warehouse(WarehouseError::UnknownReference(_))
        ));
        assert!(output(r).contains("✓ Added Assembly @3 Shaft"));
    }

    #[test]
    fn test_blank_numbers_use_config_defaults() {
        console::set_colors_enabled(false);
        let config = Config {
            default_year: Some(1999),
            default_price: Some(2.5),
            ..Config::default()
        };
        let mut r = ScriptRunner::new(Session::new(config), OutputFormat::Tsv, true, Vec::new());
        let script = "register a b\nadd detail --name Gear --manufacturer X --material steel\nstock\n";
        assert!(r.run_script(script, false).is_empty());
        let out = output(r);
        assert!(out.contains("@1\tDetail\tGear\tX\t1999\t2.5\tsteel"));
        assert!(!out.contains("✓"));
    }

    #[test]
    fn test_malformed_price_rejected() {
        let mut r = runner();
        let failures = r.run_script(
            "register a b\nadd detail --name Gear --manufacturer X --price cheap --material steel\n",
            false,
        );
        assert!(matches!(
            failures[0].error,
            CommandError::Input(InputError::InvalidNumericInput { field: "price", .. })
        ));
        assert_eq!(r.session().warehouse().unwrap().len(), 0);
    }

    #[test]
    fn test_parse_errors() {
        let mut r = runner();
        let failures = r.run_script("frobnicate\nregister \"alice\n", true);
        assert_eq!(failures.len(), 2);
        assert!(matches!(failures[0].error, CommandError::Parse(_)));
        assert!(failures[0].to_string().starts_with("line 1: "));
        assert!(matches!(failures[1].error, CommandError::Parse(_)));
    }

    #[test]
    fn test_show_and_tree() {
        let mut r = runner();
        let script = r#"
register alice pw1
add detail --name Bolt --manufacturer ACME --year 2020 --price 0.5 --material steel
add assembly --name Shaft --manufacturer ACME --year 2021 --price 5 --details @1
show @2
tree @2
"#;
        assert!(r.run_script(script, false).is_empty());
        let out = output(r);
        assert!(out.contains("Assembly: Shaft\n"));
        assert!(out.contains("  details: Bolt\n"));
        assert!(out.contains("@2 Shaft [Assembly]\n└─ Bolt [Detail, steel]\n"));
    }

    #[test]
    fn test_logout_then_inventory_fails() {
        let mut r = runner();
        let failures = r.run_script("register a b\nlogout\nsummary\n", false);
        assert_eq!(failures[0].line, 3);
        assert!(output(r).contains("✓ Logged out 'a'"));
    }
}
