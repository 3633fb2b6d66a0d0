use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use creator_scout::api::DiscoveryClient;
use creator_scout::classify::partition_by_tier;
use creator_scout::controller::assign::{AssignOutcome, CampaignAssignment};
use creator_scout::controller::reset::{ResetOutcome, SeenHistoryReset};
use creator_scout::controller::search::SearchController;
use creator_scout::controller::totals;
use creator_scout::model::{Creator, ScoutEvent, SearchResult};
use creator_scout::params::{build_search_params, FilterSelections};
use crate::text_summary;

/// Output line routing for the stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "creator-scout",
    version,
    about = "Discover social-media creators and curate them into campaigns"
)]
pub struct Cli {
    /// Base URL of the discovery API
    #[arg(long, default_value = "http://localhost:8000", global = true)]
    pub base_url: String,

    /// Request timeout for API calls
    #[arg(long, default_value = "30s", global = true)]
    pub timeout: humantime::Duration,

    /// Print raw JSON instead of the text summary
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Search for creators matching demographic and performance filters
    Search(SearchArgs),
    /// Inspect one persisted creator by internal id
    Creator { id: i64 },
    /// Manage campaigns
    Campaigns {
        #[command(subcommand)]
        command: CampaignCommand,
    },
    /// Clear the server-side seen-history deduplication record
    ResetSeen {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Parser, Clone)]
pub struct SearchArgs {
    /// Platform to search (e.g. instagram, tiktok, twitter; empty = all)
    #[arg(long, default_value = "")]
    pub platform: String,

    /// Niche/category filter
    #[arg(long, default_value = "")]
    pub niche: String,

    /// Creator gender filter
    #[arg(long, default_value = "")]
    pub gender: String,

    /// Audience country filter
    #[arg(long, default_value = "")]
    pub country: String,

    /// Sort field (backend default when omitted)
    #[arg(long, default_value = "")]
    pub sort_by: String,

    /// Minimum follower count
    #[arg(long)]
    pub min_followers: Option<u64>,

    /// Maximum follower count
    #[arg(long)]
    pub max_followers: Option<u64>,

    /// Minimum engagement rate
    #[arg(long)]
    pub min_engagement: Option<f64>,

    /// Minimum estimated age
    #[arg(long)]
    pub age_min: Option<u32>,

    /// Maximum estimated age
    #[arg(long)]
    pub age_max: Option<u32>,

    /// Result page
    #[arg(long)]
    pub page: Option<u32>,

    /// Only include creators with confirmed demographics
    #[arg(long)]
    pub strict_demographics: bool,

    /// Exclude creators already surfaced by past searches
    #[arg(long)]
    pub exclude_seen: bool,

    /// Deep search: one large page for maximal volume
    #[arg(long)]
    pub deep: bool,

    /// Offer to assign a result to a campaign after the search
    #[arg(long)]
    pub assign: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum CampaignCommand {
    /// List all campaigns
    List,
    /// Show one campaign with its member creators
    Show { id: i64 },
    /// Create a new campaign
    Create {
        name: String,
        /// Filter snapshot to record with the campaign, as a JSON object
        #[arg(long)]
        filters: Option<String>,
    },
    /// Add a persisted creator to a campaign
    Add {
        campaign_id: i64,
        creator_id: i64,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a creator from a campaign
    Remove { campaign_id: i64, creator_id: i64 },
    /// Print the CSV export URL for a campaign
    ExportUrl { id: i64 },
}

/// Map search CLI flags onto raw filter selections (empty string = unset).
fn selections_from_args(args: &SearchArgs) -> FilterSelections {
    FilterSelections {
        platform: args.platform.clone(),
        niche: args.niche.clone(),
        gender: args.gender.clone(),
        country: args.country.clone(),
        sort_by: args.sort_by.clone(),
        min_followers: args.min_followers,
        max_followers: args.max_followers,
        min_engagement: args.min_engagement,
        age_min: args.age_min,
        age_max: args.age_max,
        page: args.page,
        strict_demographics: args.strict_demographics,
        exclude_seen: args.exclude_seen,
    }
}

pub async fn run(args: Cli) -> Result<()> {
    let client = Arc::new(
        DiscoveryClient::new(&args.base_url, args.timeout.into())
            .context("failed to construct API client")?,
    );

    match args.command.clone() {
        Command::Search(search_args) => run_search(client, &search_args, args.json).await,
        Command::Creator { id } => run_creator(client, id, args.json).await,
        Command::Campaigns { command } => run_campaigns(client, command, args.json).await,
        Command::ResetSeen { yes } => run_reset_seen(client, yes).await,
    }
}

async fn run_search(client: Arc<DiscoveryClient>, args: &SearchArgs, json: bool) -> Result<()> {
    let params = build_search_params(&selections_from_args(args), args.deep);

    let (out_tx, out_handle) = spawn_output_writer();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ScoutEvent>();

    // Advisory database total, independent of the search itself.
    let totals_handle = totals::spawn(client.clone(), event_tx.clone());

    let mut controller = SearchController::new(client.clone());
    let controller_tx = event_tx.clone();
    let handle = tokio::spawn(async move {
        controller.run(params, &controller_tx).await;
        controller
    });
    // The loop below ends once the controller and totals tasks drop their
    // senders.
    drop(event_tx);

    let mut result: Option<Box<SearchResult>> = None;
    let mut failure: Option<String> = None;
    let mut db_total: Option<u64> = None;

    while let Some(event) = event_rx.recv().await {
        match event {
            ScoutEvent::SearchStarted { deep } => {
                if !json {
                    let label = if deep { "Deep search" } else { "Search" };
                    let _ = out_tx.send(OutputLine::Stderr(format!("{label} started…")));
                }
            }
            ScoutEvent::SearchTick { elapsed_secs } => {
                if !json {
                    let _ = out_tx.send(OutputLine::Stderr(format!("Searching… {elapsed_secs}s")));
                }
            }
            ScoutEvent::SearchCompleted { result: r } => result = Some(r),
            ScoutEvent::SearchFailed { message } => failure = Some(message),
            ScoutEvent::TotalsUpdated { db_total: n } => db_total = Some(n),
            ScoutEvent::Info(msg) => {
                let _ = out_tx.send(OutputLine::Stderr(msg));
            }
        }
    }

    let controller = handle.await.context("search controller task failed")?;
    let _ = totals_handle.await;

    if let Some(message) = failure {
        // Recoverable: report inline and leave the operator free to retry.
        let _ = out_tx.send(OutputLine::Stderr(format!("Search failed: {message}")));
        drop(out_tx);
        let _ = out_handle.await;
        return Ok(());
    }

    let result = result.map(|b| *b).unwrap_or(SearchResult {
        creators: controller.state.creators.clone(),
        total: controller.state.total,
        db_total: controller.state.db_total,
        page: 0,
    });

    if json {
        let _ = out_tx.send(OutputLine::Stdout(serde_json::to_string_pretty(&result)?));
        drop(out_tx);
        let _ = out_handle.await;
        return Ok(());
    }

    let creators = result.creators.clone();
    let partition = partition_by_tier(result.creators);
    let summary = text_summary::build_search_summary(
        &partition,
        result.total,
        db_total.or(Some(result.db_total)),
    );
    for line in summary.lines {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }
    drop(out_tx);
    let _ = out_handle.await;

    if args.assign && !creators.is_empty() {
        run_interactive_assignment(client, &creators).await?;
    }

    Ok(())
}

/// Two-step chooser: pick a creator from the results, then a campaign.
/// Commit failures keep the chooser open so the operator can retry.
async fn run_interactive_assignment(
    client: Arc<DiscoveryClient>,
    creators: &[Creator],
) -> Result<()> {
    let answer = prompt_line("Creator id to assign (blank to skip): ").await?;
    if answer.is_empty() {
        return Ok(());
    }
    let creator_id: i64 = answer.parse().context("not a numeric creator id")?;
    let Some(creator) = creators.iter().find(|c| c.id == Some(creator_id)) else {
        eprintln!("No creator with id {creator_id} in these results.");
        return Ok(());
    };

    let mut workflow = CampaignAssignment::new(client);
    workflow.open(creator.clone()).await;

    loop {
        if workflow.campaigns().is_empty() {
            eprintln!("No campaigns available (create one with `campaigns create`).");
        } else {
            eprintln!("Campaigns:");
            for campaign in workflow.campaigns() {
                eprintln!("  [{}] {}", campaign.id, campaign.name);
            }
        }
        let answer = prompt_line("Campaign id (q to cancel): ").await?;
        if answer.eq_ignore_ascii_case("q") {
            workflow.cancel();
            return Ok(());
        }
        let Ok(campaign_id) = answer.parse::<i64>() else {
            eprintln!("Not a campaign id: {answer}");
            continue;
        };
        match workflow.confirm(campaign_id, None).await {
            AssignOutcome::Committed => {
                println!("Added @{} to campaign {campaign_id}.", creator.handle);
                return Ok(());
            }
            AssignOutcome::Failed(message) => {
                // Chooser stays open; retry or cancel.
                eprintln!("Could not add creator: {message}");
            }
            AssignOutcome::Ignored => {
                eprintln!("Creator has not been persisted yet; run a search first.");
                workflow.cancel();
                return Ok(());
            }
        }
    }
}

async fn run_creator(client: Arc<DiscoveryClient>, id: i64, json: bool) -> Result<()> {
    let creator = client.get_creator(id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&creator)?);
    } else {
        println!(
            "@{} ({}) — {} followers, {:.2}% engagement, overall score {:.1}",
            creator.handle,
            creator.platform,
            creator.follower_count,
            creator.engagement_rate,
            creator.overall_score
        );
        if !creator.bio.is_empty() {
            println!("{}", creator.bio);
        }
        if !creator.niche_tags.is_empty() {
            println!("Niches: {}", creator.niche_tags.join(", "));
        }
    }
    Ok(())
}

async fn run_campaigns(
    client: Arc<DiscoveryClient>,
    command: CampaignCommand,
    json: bool,
) -> Result<()> {
    match command {
        CampaignCommand::List => {
            let campaigns = client.list_campaigns().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&campaigns)?);
            } else {
                for line in text_summary::build_campaign_summary(&campaigns).lines {
                    println!("{line}");
                }
            }
        }
        CampaignCommand::Show { id } => {
            let campaign = client.get_campaign(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&campaign)?);
            } else {
                println!("[{}] {} (created {})", campaign.id, campaign.name, campaign.created_at);
                for member in campaign.creators.unwrap_or_default() {
                    let notes = if member.notes.is_empty() {
                        String::new()
                    } else {
                        format!(" — {}", member.notes)
                    };
                    println!(
                        "  [{}] @{} ({}) score {:.1}, added {}{notes}",
                        member.id,
                        member.handle,
                        member.platform,
                        member.overall_score,
                        member.added_at
                    );
                }
            }
        }
        CampaignCommand::Create { name, filters } => {
            let snapshot = match filters {
                Some(raw) => {
                    serde_json::from_str(&raw).context("--filters is not valid JSON")?
                }
                None => serde_json::json!({}),
            };
            let campaign = client.create_campaign(&name, snapshot).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&campaign)?);
            } else {
                println!("Created campaign [{}] {}", campaign.id, campaign.name);
            }
        }
        CampaignCommand::Add {
            campaign_id,
            creator_id,
            notes,
        } => {
            // Drive the assignment workflow non-interactively: fetch the
            // persisted creator, open, confirm.
            let creator = client.get_creator(creator_id).await?;
            let mut workflow = CampaignAssignment::new(client);
            workflow.open(creator).await;
            match workflow.confirm(campaign_id, notes.as_deref()).await {
                AssignOutcome::Committed => println!("Added creator {creator_id} to campaign {campaign_id}."),
                AssignOutcome::Failed(message) => anyhow::bail!("could not add creator: {message}"),
                AssignOutcome::Ignored => {
                    anyhow::bail!("creator {creator_id} has no persisted id and cannot be assigned")
                }
            }
        }
        CampaignCommand::Remove {
            campaign_id,
            creator_id,
        } => {
            client.remove_creator(campaign_id, creator_id).await?;
            println!("Removed creator {creator_id} from campaign {campaign_id}.");
        }
        CampaignCommand::ExportUrl { id } => {
            println!("{}", client.export_url(id));
        }
    }
    Ok(())
}

async fn run_reset_seen(client: Arc<DiscoveryClient>, yes: bool) -> Result<()> {
    let mut workflow = SeenHistoryReset::new(client);
    workflow.open();

    if !yes {
        let answer =
            prompt_line("This clears the seen history on the server. Type 'yes' to confirm: ")
                .await?;
        if answer != "yes" {
            workflow.cancel();
            println!("Aborted.");
            return Ok(());
        }
    }

    match workflow.commit().await {
        ResetOutcome::Done(message) => {
            println!("{}", message.unwrap_or_else(|| "Seen history cleared.".to_owned()));
            Ok(())
        }
        ResetOutcome::Failed(message) => Err(anyhow::anyhow!("reset failed: {message}")),
        ResetOutcome::Ignored => Ok(()),
    }
}

/// Prompt on stderr and read one trimmed line from stdin without blocking
/// the runtime.
async fn prompt_line(prompt: &str) -> Result<String> {
    {
        let mut err = std::io::stderr();
        write!(err, "{prompt}")?;
        err.flush()?;
    }
    let line = tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        std::io::stdin().read_line(&mut buf).map(|_| buf)
    })
    .await
    .context("stdin reader task failed")??;
    Ok(line.trim().to_owned())
}
