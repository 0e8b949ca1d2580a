use std::path::PathBuf;

use chrono::NaiveDate;
use slimkop_core::clock::parse_date;
use slimkop_core::Activity;
use slimkop_core::ActivityDraft;
use slimkop_core::ActivityPatch;
use slimkop_core::ActivityPhase;
use slimkop_core::Language;
use slimkop_core::LocalizedText;
use slimkop_core::Theme;
use slimkop_core::UserPatch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub date: Option<NaiveDate>,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Toggle(String),
    Reset {
        yes: bool,
    },
    User(UserPatch),
    Add {
        phase: ActivityPhase,
        draft: ActivityDraft,
    },
    Update {
        phase: ActivityPhase,
        id: String,
        edit: ActivityEdit,
    },
    Remove {
        phase: ActivityPhase,
        id: String,
    },
    Move {
        phase: ActivityPhase,
        from: usize,
        to: usize,
    },
    Rename {
        phase: ActivityPhase,
        name: LocalizedText,
    },
    Translate(String),
    Help,
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEdit {
    Minutes(u32),
    Off,
}

/// Field edits from the command line. A single label language is merged with the current label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityEdit {
    pub icon: Option<String>,
    pub af: Option<String>,
    pub en: Option<String>,
    pub timer: Option<TimerEdit>,
}

impl ActivityEdit {
    pub fn into_patch(self, current: &Activity) -> ActivityPatch {
        let label = if self.af.is_some() || self.en.is_some() {
            Some(LocalizedText {
                af: self.af.unwrap_or_else(|| current.label.af.clone()),
                en: self.en.unwrap_or_else(|| current.label.en.clone()),
            })
        } else {
            None
        };
        let (has_timer, timer_duration_minutes) = match self.timer {
            Some(TimerEdit::Minutes(minutes)) => (Some(true), Some(Some(minutes))),
            Some(TimerEdit::Off) => (Some(false), Some(None)),
            None => (None, None),
        };
        ActivityPatch {
            icon_name: self.icon,
            label,
            has_timer,
            timer_duration_minutes,
        }
    }
}

type ParseResult<T> = Result<T, String>;

pub fn parse_args(args: Vec<String>) -> ParseResult<Invocation> {
    let mut data_dir = None;
    let mut config = None;
    let mut date = None;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--data-dir" => {
                data_dir = Some(PathBuf::from(value(&args, i, "--data-dir")?));
                i += 2;
            }
            "--config" => {
                config = Some(PathBuf::from(value(&args, i, "--config")?));
                i += 2;
            }
            "--date" => {
                let raw = value(&args, i, "--date")?;
                date = Some(parse_date(raw).ok_or_else(|| format!("invalid date: {raw}"))?);
                i += 2;
            }
            _ => {
                rest.extend_from_slice(&args[i..]);
                break;
            }
        }
    }

    Ok(Invocation {
        data_dir,
        config,
        date,
        command: parse_command(rest)?,
    })
}

fn parse_command(args: Vec<String>) -> ParseResult<Command> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Status);
    };
    match command.as_str() {
        "status" => no_extra(rest).map(|_| Command::Status),
        "--help" | "-h" | "help" => Ok(Command::Help),
        "--version" | "-V" | "version" => Ok(Command::Version),
        "toggle" => {
            let [id] = positionals::<1>(rest, "toggle ID")?;
            Ok(Command::Toggle(id))
        }
        "reset" => {
            let flags = Flags::parse(rest, &[], &["--yes"])?;
            flags.expect_positionals::<0>("reset [--yes]")?;
            Ok(Command::Reset {
                yes: flags.switch("--yes"),
            })
        }
        "user" => parse_user(rest),
        "add" => parse_add(rest),
        "update" => parse_update(rest),
        "remove" => {
            let [phase, id] = positionals::<2>(rest, "remove PHASE ID")?;
            Ok(Command::Remove {
                phase: parse_phase(&phase)?,
                id,
            })
        }
        "move" => {
            let [phase, from, to] = positionals::<3>(rest, "move PHASE FROM TO")?;
            Ok(Command::Move {
                phase: parse_phase(&phase)?,
                from: parse_number(&from, "FROM")?,
                to: parse_number(&to, "TO")?,
            })
        }
        "rename" => {
            let flags = Flags::parse(rest, &["--en", "--af"], &[])?;
            let [phase] = flags.expect_positionals::<1>("rename PHASE --en TEXT --af TEXT")?;
            let (Some(en), Some(af)) = (flags.value("--en"), flags.value("--af")) else {
                return Err("rename needs both --en and --af".to_string());
            };
            Ok(Command::Rename {
                phase: parse_phase(&phase)?,
                name: LocalizedText::new(af, en),
            })
        }
        "t" => {
            let [key] = positionals::<1>(rest, "t KEY")?;
            Ok(Command::Translate(key))
        }
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_user(rest: &[String]) -> ParseResult<Command> {
    let flags = Flags::parse(rest, &["--name", "--language", "--theme", "--onboarded"], &[])?;
    flags.expect_positionals::<0>("user [--name N] [--language af|en] [--theme meisie|seun] [--onboarded true|false]")?;
    let patch = UserPatch {
        name: flags.value("--name").map(str::to_string),
        language: flags
            .value("--language")
            .map(|raw| Language::parse(raw).ok_or_else(|| format!("unknown language: {raw}")))
            .transpose()?,
        theme: flags
            .value("--theme")
            .map(|raw| Theme::parse(raw).ok_or_else(|| format!("unknown theme: {raw}")))
            .transpose()?,
        onboarding_complete: flags
            .value("--onboarded")
            .map(|raw| match raw {
                "true" | "yes" => Ok(true),
                "false" | "no" => Ok(false),
                _ => Err(format!("--onboarded expects true or false, got {raw}")),
            })
            .transpose()?,
    };
    Ok(Command::User(patch))
}

fn parse_add(rest: &[String]) -> ParseResult<Command> {
    let flags = Flags::parse(rest, &["--icon", "--en", "--af", "--timer"], &[])?;
    let [phase] = flags.expect_positionals::<1>("add PHASE --icon NAME --en TEXT --af TEXT [--timer MIN]")?;
    let en = flags.value("--en").unwrap_or_default();
    let af = flags.value("--af").unwrap_or(en);
    let mut draft = ActivityDraft::new(
        flags.value("--icon").unwrap_or("Star"),
        LocalizedText::new(af, en),
    );
    if let Some(raw) = flags.value("--timer") {
        draft = draft.with_timer(parse_number(raw, "--timer")?);
    }
    Ok(Command::Add {
        phase: parse_phase(&phase)?,
        draft,
    })
}

fn parse_update(rest: &[String]) -> ParseResult<Command> {
    let flags = Flags::parse(rest, &["--icon", "--en", "--af", "--timer"], &["--no-timer"])?;
    let [phase, id] = flags.expect_positionals::<2>("update PHASE ID [--icon NAME] [--en TEXT] [--af TEXT] [--timer MIN | --no-timer]")?;
    let timer = match (flags.value("--timer"), flags.switch("--no-timer")) {
        (Some(_), true) => return Err("--timer and --no-timer conflict".to_string()),
        (Some(raw), false) => Some(TimerEdit::Minutes(parse_number(raw, "--timer")?)),
        (None, true) => Some(TimerEdit::Off),
        (None, false) => None,
    };
    Ok(Command::Update {
        phase: parse_phase(&phase)?,
        id,
        edit: ActivityEdit {
            icon: flags.value("--icon").map(str::to_string),
            af: flags.value("--af").map(str::to_string),
            en: flags.value("--en").map(str::to_string),
            timer,
        },
    })
}

struct Flags {
    values: Vec<(String, String)>,
    switches: Vec<String>,
    positionals: Vec<String>,
}

impl Flags {
    fn parse(args: &[String], valued: &[&str], switches: &[&str]) -> ParseResult<Self> {
        let mut flags = Flags {
            values: Vec::new(),
            switches: Vec::new(),
            positionals: Vec::new(),
        };
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            if valued.contains(&arg) {
                flags
                    .values
                    .push((arg.to_string(), value(args, i, arg)?.to_string()));
                i += 2;
            } else if switches.contains(&arg) {
                flags.switches.push(arg.to_string());
                i += 1;
            } else if arg.starts_with("--") {
                return Err(format!("unsupported argument: {arg}"));
            } else {
                flags.positionals.push(arg.to_string());
                i += 1;
            }
        }
        Ok(flags)
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(flag, _)| flag == name)
            .map(|(_, value)| value.as_str())
    }

    fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|flag| flag == name)
    }

    fn expect_positionals<const N: usize>(&self, usage: &str) -> ParseResult<[String; N]> {
        positionals::<N>(&self.positionals, usage)
    }
}

fn positionals<const N: usize>(args: &[String], usage: &str) -> ParseResult<[String; N]> {
    <[String; N]>::try_from(args.to_vec()).map_err(|_| format!("usage: slimkop {usage}"))
}

fn no_extra(args: &[String]) -> ParseResult<()> {
    match args.first() {
        Some(extra) => Err(format!("unsupported argument: {extra}")),
        None => Ok(()),
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> ParseResult<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_phase(raw: &str) -> ParseResult<ActivityPhase> {
    ActivityPhase::parse(raw).ok_or_else(|| {
        format!("unknown phase: {raw} (expected arrival, organization or study)")
    })
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> ParseResult<T> {
    raw.parse()
        .map_err(|_| format!("{what} expects a whole number, got {raw}"))
}
