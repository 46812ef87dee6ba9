use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use secretsanta::draw::{
    draw_naive, draw_with_stats_rng, validate_with, RetryCfg, SearchCfg, ValidateCfg,
};
use secretsanta::Participant;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod provenance;

use input::{
    load_participants, pairings_from_assignment, pairings_from_retry, DrawReport, StatsReport,
    ValidationReport,
};
use provenance::{write_sidecar, Provenance};

#[derive(Parser)]
#[command(name = "secretsanta")]
#[command(about = "Validate participant lists and draw Secret Santa assignments")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(clap::Args)]
struct InputArgs {
    /// Participant list (JSON array of {name, contact_info, exclusions, ...})
    #[arg(long, env = "SECRETSANTA_INPUT", default_value = "participants.json")]
    input: PathBuf,
    /// Largest group checked with the exact Hall test
    #[arg(long, default_value_t = ValidateCfg::default().exact_limit)]
    exact_limit: usize,
}

#[derive(Subcommand)]
enum Action {
    /// Check that a valid assignment can exist; exits non-zero if not
    Validate {
        #[command(flatten)]
        args: InputArgs,
    },
    /// Validate, then draw an assignment and print it as JSON
    Draw {
        #[command(flatten)]
        args: InputArgs,
        /// Seed for a reproducible draw; random when omitted
        #[arg(long)]
        seed: Option<u64>,
        /// Use the legacy retry baseline instead of backtracking (may be incomplete)
        #[arg(long)]
        naive: bool,
        /// Retry bound for --naive
        #[arg(long, default_value_t = RetryCfg::default().max_retries)]
        retries: usize,
        /// Abort the backtracking search after this many steps
        #[arg(long)]
        step_limit: Option<u64>,
        /// Include draw statistics in the output
        #[arg(long)]
        stats: bool,
        /// Also write the result here, with a provenance sidecar
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Draw parameters after flag parsing.
struct DrawOpts {
    seed: u64,
    naive: bool,
    retries: usize,
    step_limit: Option<u64>,
    stats: bool,
    exact_limit: usize,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Validate { args } => validate_cmd(args),
        Action::Draw {
            args,
            seed,
            naive,
            retries,
            step_limit,
            stats,
            out,
        } => {
            let opts = DrawOpts {
                seed: seed.unwrap_or_else(rand::random),
                naive,
                retries,
                step_limit,
                stats,
                exact_limit: args.exact_limit,
            };
            draw_cmd(&args.input, opts, out)
        }
    }
}

fn validate_cmd(args: InputArgs) -> Result<()> {
    tracing::info!(input = %args.input.display(), "validate");
    let ps = load_participants(&args.input)?;
    let report = validation_report(&ps, args.exact_limit);
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_valid {
        bail!("{} validation error(s)", report.errors.len());
    }
    Ok(())
}

fn validation_report(ps: &[Participant], exact_limit: usize) -> ValidationReport {
    let res = validate_with(ps, ValidateCfg { exact_limit });
    for w in &res.warnings {
        tracing::warn!("{w}");
    }
    ValidationReport::from(&res)
}

fn draw_cmd(input: &Path, opts: DrawOpts, out: Option<PathBuf>) -> Result<()> {
    tracing::info!(input = %input.display(), seed = opts.seed, naive = opts.naive, "draw");
    let ps = load_participants(input)?;
    let report = run_draw(&ps, &opts)?;
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");
    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&out, &json).with_context(|| format!("writing {}", out.display()))?;
        let params = serde_json::json!({
            "input": input.to_string_lossy(),
            "participants": ps.len(),
            "exact_limit": opts.exact_limit,
            "retries": opts.retries,
            "step_limit": opts.step_limit,
        });
        let prov = write_sidecar(&out, Provenance::new(report.algorithm, opts.seed, params))?;
        tracing::info!(out = %out.display(), provenance = %prov.display(), "wrote draw");
    }
    if !report.complete {
        bail!("draw incomplete: some participants have no recipient");
    }
    Ok(())
}

fn run_draw(ps: &[Participant], opts: &DrawOpts) -> Result<DrawReport> {
    let res = validate_with(
        ps,
        ValidateCfg {
            exact_limit: opts.exact_limit,
        },
    );
    for w in &res.warnings {
        tracing::warn!("{w}");
    }
    if !res.is_valid {
        bail!("participants failed validation: {}", res.errors.join("; "));
    }
    let mut rng = StdRng::seed_from_u64(opts.seed);
    if opts.naive {
        tracing::warn!("using the retry baseline; the result may be incomplete");
        let outcome = draw_naive(
            ps,
            RetryCfg {
                max_retries: opts.retries,
            },
            &mut rng,
        );
        tracing::info!(attempts = outcome.attempts, matched = outcome.matched(), "retry baseline");
        return Ok(DrawReport {
            algorithm: "retry",
            seed: opts.seed,
            complete: outcome.is_complete(),
            pairings: pairings_from_retry(ps, &outcome),
            stats: None,
        });
    }
    let cfg = SearchCfg {
        step_limit: opts.step_limit,
    };
    let (result, stats) = draw_with_stats_rng(ps, cfg, &mut rng);
    let assignment = result.context("backtracking draw failed")?;
    tracing::info!(steps = stats.steps, "backtracking");
    Ok(DrawReport {
        algorithm: "backtracking",
        seed: opts.seed,
        complete: true,
        pairings: pairings_from_assignment(ps, &assignment),
        stats: opts.stats.then(|| StatsReport::from(stats)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(seed: u64) -> DrawOpts {
        DrawOpts {
            seed,
            naive: false,
            retries: 1000,
            step_limit: None,
            stats: true,
            exact_limit: 10,
        }
    }

    fn couples() -> Vec<Participant> {
        input::parse_participants(
            r#"[
                {"name": "A", "contact_info": ["a@example.com"], "exclusions": ["B"]},
                {"name": "B", "contact_info": ["b@example.com"], "exclusions": ["A"]},
                {"name": "C", "contact_info": ["c@example.com"], "exclusions": ["D"]},
                {"name": "D", "contact_info": ["d@example.com"], "exclusions": ["C"]},
                {"name": "E", "contact_info": ["e@example.com"]},
                {"name": "F", "contact_info": ["f@example.com"]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn seeded_draw_report_is_reproducible() {
        let ps = couples();
        let a = run_draw(&ps, &opts(7)).unwrap();
        let b = run_draw(&ps, &opts(7)).unwrap();
        assert_eq!(a.pairings, b.pairings);
        assert!(a.complete);
        assert_eq!(a.algorithm, "backtracking");
        let stats = a.stats.expect("stats requested");
        assert!(stats.success);
        assert_eq!(stats.min_compatibility, 4);
        for p in &a.pairings {
            let r = p.recipient.as_deref().unwrap();
            assert_ne!(r, p.giver);
        }
    }

    #[test]
    fn infeasible_input_is_rejected_before_drawing() {
        let ps = input::parse_participants(
            r#"[
                {"name": "Emily", "exclusions": ["Ivan"]},
                {"name": "Ivan", "exclusions": ["Emily"]},
                {"name": "Eli"}
            ]"#,
        )
        .unwrap();
        let err = run_draw(&ps, &opts(1)).unwrap_err();
        assert!(err.to_string().contains("Hall's Marriage Theorem"));
        assert!(!validation_report(&ps, 10).is_valid);
    }

    #[test]
    fn naive_flag_uses_retry_baseline() {
        let ps = couples();
        let mut o = opts(3);
        o.naive = true;
        let report = run_draw(&ps, &o).unwrap();
        assert_eq!(report.algorithm, "retry");
        assert!(report.stats.is_none());
        assert_eq!(report.pairings.len(), 6);
    }

    #[test]
    fn draw_cmd_writes_result_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("participants.json");
        fs::write(
            &input,
            r#"[{"name": "A", "contact_info": ["a@x"]}, {"name": "B", "contact_info": ["b@x"]}]"#,
        )
        .unwrap();
        let out = dir.path().join("out").join("draw.json");
        draw_cmd(&input, opts(5), Some(out.clone())).unwrap();
        assert!(out.exists());
        assert!(out.with_file_name("draw.provenance.json").exists());
    }
}
