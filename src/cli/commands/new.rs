//! `prr new` command - Log a new records request

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::filters::ChannelArg;
use crate::cli::helpers::{format_date, parse_timestamp, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Channel;
use crate::core::lifecycle::IntakeInput;
use crate::entities::{CaseRecord, Requester};

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Requester name
    #[arg(long)]
    pub name: Option<String>,

    /// Requester email
    #[arg(long)]
    pub email: Option<String>,

    /// Requester phone
    #[arg(long)]
    pub phone: Option<String>,

    /// How the request arrived
    #[arg(long, short = 'c', value_enum, default_value_t = ChannelArg::Staff)]
    pub channel: ChannelArg,

    /// Request text as the requester worded it
    #[arg(long, short = 't')]
    pub text: Option<String>,

    /// Requester accepted the legal notice
    #[arg(long)]
    pub accept_notice: bool,

    /// Receipt date or timestamp (default: now)
    #[arg(long)]
    pub received_at: Option<String>,

    /// Actor recorded on the intake entry (default: config actor)
    #[arg(long)]
    pub actor: Option<String>,

    /// Prompt for each field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub fn run(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open()?;
    let actor = args.actor.clone().unwrap_or_else(|| session.config.actor());

    let input = if args.interactive {
        prompt_input(&args, actor)?
    } else {
        let name = args
            .name
            .ok_or_else(|| miette::miette!("--name is required (or use --interactive)"))?;
        let text = args
            .text
            .ok_or_else(|| miette::miette!("--text is required (or use --interactive)"))?;
        let requester = Requester {
            name,
            email: args.email,
            phone: args.phone,
        };
        let mut input = IntakeInput::new(requester, args.channel.into(), text, actor)
            .with_notice_accepted(args.accept_notice);
        if let Some(ref received_at) = args.received_at {
            input = input.received_at(parse_timestamp(received_at)?);
        }
        input
    };

    let case = session.desk.submit(input)?;
    print_created(&case, global)
}

fn prompt_input(args: &NewArgs, actor: String) -> Result<IntakeInput> {
    let theme = ColorfulTheme::default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("Requester name")
        .with_initial_text(args.name.clone().unwrap_or_default())
        .interact_text()
        .into_diagnostic()?;

    let email: String = Input::with_theme(&theme)
        .with_prompt("Email (optional)")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    let phone: String = Input::with_theme(&theme)
        .with_prompt("Phone (optional)")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    let channels: Vec<&str> = Channel::all().iter().map(|c| c.as_str()).collect();
    let default_channel = Channel::all()
        .iter()
        .position(|c| *c == Channel::from(args.channel))
        .unwrap_or(0);
    let selection = Select::with_theme(&theme)
        .with_prompt("Channel")
        .items(&channels)
        .default(default_channel)
        .interact()
        .into_diagnostic()?;
    let channel = Channel::all()[selection];

    let text: String = Input::with_theme(&theme)
        .with_prompt("Request text")
        .with_initial_text(args.text.clone().unwrap_or_default())
        .interact_text()
        .into_diagnostic()?;

    let accepted = Confirm::with_theme(&theme)
        .with_prompt("Legal notice accepted?")
        .default(args.accept_notice)
        .interact()
        .into_diagnostic()?;

    let optional = |s: String| {
        let s = s.trim().to_string();
        (!s.is_empty()).then_some(s)
    };
    let requester = Requester {
        name,
        email: optional(email),
        phone: optional(phone),
    };
    let mut input =
        IntakeInput::new(requester, channel, text, actor).with_notice_accepted(accepted);
    if let Some(ref received_at) = args.received_at {
        input = input.received_at(parse_timestamp(received_at)?);
    }
    Ok(input)
}

fn print_created(case: &CaseRecord, global: &GlobalOpts) -> Result<()> {
    match global.output {
        OutputFormat::Id => println!("{}", case.case_id),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(case).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(case).into_diagnostic()?),
        _ => {
            if global.quiet {
                println!("{}", case.case_id);
                return Ok(());
            }
            println!(
                "{} Created case {}",
                style("✓").green(),
                style(&case.case_id).cyan()
            );
            println!(
                "   Received {}  T10 {}",
                format_date(&case.intake.received_at),
                style(format_date(&case.deadlines.t10)).yellow()
            );
        }
    }
    Ok(())
}
