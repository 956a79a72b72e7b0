//! REPL – Read-Eval-Print Loop for the PartyVault shell.
//!
//! Supported slash-commands:
//!   /help                 – show this list
//!   /list                 – list saved party names
//!   /show [--json]        – print the party being edited
//!   /add <stats> [ids…]   – append a member (`class,hp,mp,str,agi,wis` then equipment ids)
//!   /remove <index>       – drop a member
//!   /clear                – empty the party
//!   /name [text]          – set (or clear) the party name input
//!   /save [name]          – save the party under the name input
//!   /load <name>          – load a saved party
//!   /delete [name]        – delete the party named by the input
//!   /quicksave, /quickload – single-slot save and load
//!   /rescan               – rebuild the name list from disk
//!   /settings             – edit `~/.partyvault/config.toml`
//!   /quit | /exit         – exit the CLI

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use partyvault_store::{PartySession, PartyView, StoreError, decode_slot};
use partyvault_types::{DecodeWarning, PartyCharacter};

use crate::config::{self, Config};

/// A parsed REPL input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Show { json: bool },
    Add { stats: String, equipment: String },
    Remove(usize),
    Clear,
    Name(String),
    Save(Option<String>),
    Load(String),
    Delete(Option<String>),
    QuickSave,
    QuickLoad,
    Rescan,
    Settings,
    Quit,
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    /// Parse one trimmed, non-empty input line.
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        match head {
            "/help" => Command::Help,
            "/list" => Command::List,
            "/show" => Command::Show { json: rest == "--json" },
            "/add" => match rest.split_once(char::is_whitespace) {
                Some((stats, equipment)) => Command::Add {
                    stats: stats.to_string(),
                    equipment: equipment.trim().to_string(),
                },
                None if !rest.is_empty() => Command::Add {
                    stats: rest.to_string(),
                    equipment: String::new(),
                },
                None => Command::Usage("/add <class,health,mana,strength,agility,wisdom> [equipment ids…]"),
            },
            "/remove" => match rest.parse::<usize>() {
                Ok(index) => Command::Remove(index),
                Err(_) => Command::Usage("/remove <index>"),
            },
            "/clear" => Command::Clear,
            "/name" => Command::Name(rest.to_string()),
            "/save" => Command::Save(arg),
            "/load" => match arg {
                Some(name) => Command::Load(name),
                None => Command::Usage("/load <name>"),
            },
            "/delete" => Command::Delete(arg),
            "/quicksave" => Command::QuickSave,
            "/quickload" => Command::QuickLoad,
            "/rescan" => Command::Rescan,
            "/settings" => Command::Settings,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// The terminal stand-in for the party UI.
#[derive(Debug, Default)]
pub struct ReplView {
    party: Vec<PartyCharacter>,
    name_input: String,
}

impl PartyView for ReplView {
    fn party(&self) -> &[PartyCharacter] {
        &self.party
    }

    fn replace_party(&mut self, party: Vec<PartyCharacter>) {
        self.party = party;
    }

    fn party_name_input(&self) -> String {
        self.name_input.clone()
    }

    fn refresh(&mut self) {
        let name = if self.name_input.is_empty() {
            "<none>".dimmed().to_string()
        } else {
            self.name_input.bold().to_string()
        };
        println!(
            "  {} {} member(s), name input: {}",
            "Party:".bold(),
            self.party.len(),
            name
        );
    }
}

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run(shutdown: Arc<AtomicBool>, cfg: Config) {
    let mut view = ReplView::default();
    let Some(mut session) = start_session(&cfg, &mut view) else {
        return;
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "partyvault>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Command::Help => cmd_help(),
            Command::List => cmd_list(&session),
            Command::Show { json } => cmd_show(&view, json),
            Command::Add { stats, equipment } => cmd_add(&mut view, &stats, &equipment),
            Command::Remove(index) => {
                if index < view.party.len() {
                    view.party.remove(index);
                    view.refresh();
                } else {
                    println!("{} no member at index {}", "Error:".red(), index);
                }
            }
            Command::Clear => {
                view.party.clear();
                view.refresh();
            }
            Command::Name(name) => {
                view.name_input = name;
                view.refresh();
            }
            Command::Save(name) => report(
                with_name_input(&mut view, name, |v| session.save_pressed(v)),
                "Party saved",
            ),
            Command::Load(name) => {
                let result = session.load_selected(&name, &mut view);
                if result.is_ok() {
                    view.name_input = name;
                }
                report_load(result);
            }
            Command::Delete(name) => report(
                with_name_input(&mut view, name, |v| session.delete_pressed(v)),
                "Party deleted",
            ),
            Command::QuickSave => report(session.quick_save_pressed(&mut view), "Quick save written"),
            Command::QuickLoad => report_load(session.quick_load_pressed(&mut view)),
            Command::Rescan => {
                report(session.rescan(&mut view), "Name list rebuilt");
                cmd_list(&session);
            }
            Command::Settings => {
                if let Some(new_cfg) = cmd_settings()
                    && let Some(restarted) = start_session(&new_cfg, &mut view)
                {
                    session = restarted;
                }
            }
            Command::Quit => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            Command::Usage(usage) => println!("{} {}", "Usage:".yellow(), usage),
            Command::Unknown(other) => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
            }
        }
    }
}

/// Run `action` with `name` (when given) as the name input.  The previous
/// input comes back if the action fails.
fn with_name_input<T>(
    view: &mut ReplView,
    name: Option<String>,
    action: impl FnOnce(&mut ReplView) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let previous = name.map(|name| std::mem::replace(&mut view.name_input, name));
    let result = action(view);
    if result.is_err()
        && let Some(previous) = previous
    {
        view.name_input = previous;
    }
    result
}

fn start_session(cfg: &Config, view: &mut ReplView) -> Option<PartySession> {
    let layout = cfg.layout();
    match PartySession::start(&layout, view) {
        Ok(session) => {
            println!(
                "  Parties stored in {} ({} saved)",
                layout.save_dir.display().to_string().bold(),
                session.party_names().len()
            );
            Some(session)
        }
        Err(e) => {
            println!("{}: {}", "Could not open party storage".red(), e);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "PartyVault Commands".bold().underline());
    println!("  {}          – list saved parties", "/list".bold().cyan());
    println!("  {} – print the current party", "/show [--json]".bold().cyan());
    println!("  {} – add a member", "/add <c,h,m,s,a,w> [ids…]".bold().cyan());
    println!("  {}  – remove a member", "/remove <index>".bold().cyan());
    println!("  {}         – empty the party", "/clear".bold().cyan());
    println!("  {}   – set the party name", "/name [text]".bold().cyan());
    println!("  {}   – save under the party name", "/save [name]".bold().cyan());
    println!("  {}   – load a saved party", "/load <name>".bold().cyan());
    println!("  {} – delete a saved party", "/delete [name]".bold().cyan());
    println!("  {} – single-slot save / load", "/quicksave  /quickload".bold().cyan());
    println!("  {}        – rebuild the name list from disk", "/rescan".bold().cyan());
    println!("  {}      – edit ~/.partyvault/config.toml", "/settings".bold().cyan());
    println!("  {}   – exit the CLI", "/quit  /exit".bold().cyan());
    println!();
}

fn cmd_list(session: &PartySession) {
    let names = session.party_names();
    if names.is_empty() {
        println!("  {}", "No saved parties.".dimmed());
        return;
    }
    println!("{}", "Saved Parties".bold().underline());
    for name in names {
        println!("    • {}", name.bold());
    }
}

fn cmd_show(view: &ReplView, json: bool) {
    if json {
        match serde_json::to_string_pretty(&view.party) {
            Ok(text) => println!("{text}"),
            Err(e) => println!("{}: {}", "Serialization error".red(), e),
        }
        return;
    }
    if view.party.is_empty() {
        println!("  {}", "The party is empty.".dimmed());
        return;
    }
    println!(
        "  {:>3}  {:>5} {:>6} {:>6} {:>6} {:>6} {:>6}  {}",
        "#", "class", "health", "mana", "str", "agi", "wis", "equipment"
    );
    for (i, pc) in view.party.iter().enumerate() {
        let equipment: Vec<String> = pc.equipment.iter().map(i32::to_string).collect();
        println!(
            "  {:>3}  {:>5} {:>6} {:>6} {:>6} {:>6} {:>6}  {}",
            i,
            pc.class_id,
            pc.health,
            pc.mana,
            pc.strength,
            pc.agility,
            pc.wisdom,
            equipment.join(" ")
        );
    }
}

fn cmd_add(view: &mut ReplView, stats: &str, equipment: &str) {
    match parse_member(stats, equipment) {
        Ok((member, warnings)) => {
            print_warnings(&warnings);
            view.party.push(member);
            view.refresh();
        }
        Err(_) => println!(
            "{} expected six comma-separated integers, got '{}'",
            "Error:".red(),
            stats.yellow()
        ),
    }
}

/// Build one member from REPL input using the persisted text format.
pub(crate) fn parse_member(
    stats: &str,
    equipment: &str,
) -> Result<(PartyCharacter, Vec<DecodeWarning>), Vec<DecodeWarning>> {
    let mut decoded = decode_slot(&format!("{stats}\n{equipment}\n"));
    match decoded.records.pop() {
        Some(member) if decoded.records.is_empty() => Ok((member, decoded.warnings)),
        _ => Err(decoded.warnings),
    }
}

fn cmd_settings() -> Option<Config> {
    let mut cfg = match config::load() {
        Ok(Some(c)) => c,
        Ok(None) => Config::default(),
        Err(e) => {
            println!("{}: {}", "Error loading config".red(), e);
            return None;
        }
    };

    println!("{}", "Settings Editor".bold().underline());
    cfg.save_dir = prompt_str(&format!("  Save directory  [{}]: ", cfg.save_dir), &cfg.save_dir);
    cfg.slot_extension = prompt_str(
        &format!("  Slot extension  [{}]: ", cfg.slot_extension),
        &cfg.slot_extension,
    )
    .trim_start_matches('.')
    .to_string();
    cfg.quick_save_file = prompt_str(
        &format!("  Quick-save file [{}]: ", cfg.quick_save_file),
        &cfg.quick_save_file,
    );

    match config::save(&cfg) {
        Ok(()) => {
            println!(
                "{} {}",
                "✓ Settings saved to".green(),
                config::config_path().display().to_string().bold()
            );
            Some(cfg)
        }
        Err(e) => {
            println!("{}: {}", "Error saving config".red(), e);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn report(result: Result<(), StoreError>, success: &str) {
    match result {
        Ok(()) => println!("{} {}", "✓".green().bold(), success.green()),
        Err(e) => print_store_error(&e),
    }
}

fn report_load(result: Result<Vec<DecodeWarning>, StoreError>) {
    match result {
        Ok(warnings) => {
            println!("{} {}", "✓".green().bold(), "Party loaded".green());
            print_warnings(&warnings);
        }
        Err(e) => print_store_error(&e),
    }
}

fn print_store_error(e: &StoreError) {
    let label = match e {
        StoreError::InvalidName(_) => "Invalid name",
        StoreError::NotFound(_) => "Not found",
        StoreError::Io { .. } => "Storage error",
    };
    println!("{}: {}", label.red(), e);
}

fn print_warnings(warnings: &[DecodeWarning]) {
    for warning in warnings {
        println!("  {} {}", "Skipped:".yellow(), warning);
    }
}

/// Prompt for a string value.  Returns `default` when the user presses Enter.
fn prompt_str(msg: &str, default: &str) -> String {
    print!("{}", msg);
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            let trimmed = line.trim().to_string();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed
            }
        }
        Err(_) => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("  /list  "), Command::List);
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/quickload"), Command::QuickLoad);
    }

    #[test]
    fn parse_show_json_flag() {
        assert_eq!(Command::parse("/show"), Command::Show { json: false });
        assert_eq!(Command::parse("/show --json"), Command::Show { json: true });
    }

    #[test]
    fn parse_save_keeps_spaces_in_name() {
        assert_eq!(
            Command::parse("/save Party of Two"),
            Command::Save(Some("Party of Two".to_string()))
        );
        assert_eq!(Command::parse("/save"), Command::Save(None));
    }

    #[test]
    fn parse_load_requires_name() {
        assert_eq!(Command::parse("/load heroes"), Command::Load("heroes".to_string()));
        assert!(matches!(Command::parse("/load"), Command::Usage(_)));
    }

    #[test]
    fn parse_add_splits_stats_from_equipment() {
        assert_eq!(
            Command::parse("/add 1,100,20,8,6,4 3 9 9"),
            Command::Add {
                stats: "1,100,20,8,6,4".to_string(),
                equipment: "3 9 9".to_string(),
            }
        );
        assert_eq!(
            Command::parse("/add 1,100,20,8,6,4"),
            Command::Add {
                stats: "1,100,20,8,6,4".to_string(),
                equipment: String::new(),
            }
        );
        assert!(matches!(Command::parse("/add"), Command::Usage(_)));
    }

    #[test]
    fn parse_remove_index() {
        assert_eq!(Command::parse("/remove 2"), Command::Remove(2));
        assert!(matches!(Command::parse("/remove two"), Command::Usage(_)));
    }

    #[test]
    fn parse_unknown_command() {
        assert_eq!(
            Command::parse("/roll"),
            Command::Unknown("/roll".to_string())
        );
    }

    #[test]
    fn parse_member_uses_record_format() {
        let (member, warnings) = parse_member("2,80,120,4,8,18", "5 x 6").unwrap();
        assert_eq!(member, PartyCharacter::new(2, 80, 120, 4, 8, 18).with_equipment([5, 6]));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn parse_member_rejects_bad_stats() {
        let warnings = parse_member("2,80,120", "").unwrap_err();
        assert!(matches!(warnings[0], DecodeWarning::MalformedRecord { .. }));
    }

    fn session_in(dir: &std::path::Path, view: &mut ReplView) -> PartySession {
        let cfg = Config {
            save_dir: dir.join("SavedParties").to_string_lossy().into_owned(),
            slot_extension: "txt".to_string(),
            quick_save_file: dir.join("quick.txt").to_string_lossy().into_owned(),
        };
        start_session(&cfg, view).expect("session")
    }

    #[test]
    fn rejected_save_name_leaves_input_unchanged() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let mut view = ReplView {
            name_input: "heroes".to_string(),
            ..ReplView::default()
        };
        let mut session = session_in(dir.path(), &mut view);

        let result = with_name_input(&mut view, Some("   ".to_string()), |v| {
            session.save_pressed(v)
        });
        assert!(matches!(result, Err(StoreError::InvalidName(_))));
        assert_eq!(view.name_input, "heroes");
    }

    #[test]
    fn failed_delete_name_leaves_input_unchanged() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let mut view = ReplView::default();
        let mut session = session_in(dir.path(), &mut view);

        let result = with_name_input(&mut view, Some("ghost".to_string()), |v| {
            session.delete_pressed(v)
        });
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(view.name_input.is_empty());
    }

    #[test]
    fn accepted_save_name_becomes_input() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let mut view = ReplView::default();
        let mut session = session_in(dir.path(), &mut view);

        with_name_input(&mut view, Some("heroes".to_string()), |v| {
            session.save_pressed(v)
        })
        .expect("save");
        assert_eq!(view.name_input, "heroes");
        assert_eq!(session.party_names(), ["heroes"]);
    }

    #[test]
    fn view_replace_and_name_input() {
        let mut view = ReplView::default();
        assert!(view.party_name_input().is_empty());
        view.replace_party(vec![PartyCharacter::new(1, 2, 3, 4, 5, 6)]);
        assert_eq!(view.party().len(), 1);
    }
}
