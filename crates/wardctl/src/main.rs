use anyhow::Context;
use clap::{Parser, Subcommand};
use ward_core::{
    CitizenReport, DetectionFrame, EvidenceRef, Incident, IntakeOutcome, IssueKind, Location,
    WorkerId,
};

#[derive(Parser, Debug)]
#[command(name = "wardctl", version, about = "Operator CLI for the ward daemon")]
struct Args {
    /// Base URL of the daemon, e.g. http://127.0.0.1:8787
    #[arg(long, global = true, default_value = "http://127.0.0.1:8787")]
    daemon: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// File a citizen report.
    Report {
        #[arg(long)]
        kind: String,
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
        #[arg(long)]
        address: String,
        /// Reference of the already-uploaded image; minted if omitted.
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        severity: Option<String>,
    },
    /// Submit a detector frame from a JSON file.
    Detect {
        #[arg(long)]
        file: String,
    },
    /// Dispatch a pending incident to a worker.
    Assign {
        #[arg(long)]
        incident_id: i64,
        #[arg(long)]
        worker: String,
    },
    /// Submit proof-of-fix for an assigned incident.
    Complete {
        #[arg(long)]
        incident_id: i64,
        #[arg(long)]
        worker: String,
        #[arg(long)]
        image: String,
    },
    /// Record the audit decision for a completed incident.
    Verify {
        #[arg(long)]
        incident_id: i64,
        #[arg(long, value_parser = ["approve", "reject"])]
        decision: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// List incidents, optionally filtered.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        worker: Option<String>,
    },
    /// Show one incident.
    Get {
        #[arg(long)]
        incident_id: i64,
    },
    /// Show a worker's active task queue.
    Tasks {
        #[arg(long)]
        worker: String,
    },
    /// Dashboard aggregates.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = reqwest::Client::new();
    let base = args.daemon.trim_end_matches('/').to_string();

    match args.cmd {
        Cmd::Report {
            kind,
            lat,
            lng,
            address,
            image,
            severity,
        } => {
            let kind = IssueKind::new(kind);
            let image = image
                .map(EvidenceRef::new)
                .unwrap_or_else(|| EvidenceRef::mint(&kind));
            let report = CitizenReport {
                kind,
                severity,
                location: Location { lat, lng, address },
                image,
            };
            let resp: Incident = client
                .post(format!("{base}/v1/reports"))
                .json(&report)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Cmd::Detect { file } => {
            let bytes = tokio::fs::read(&file).await.context("read file")?;
            let frame: DetectionFrame =
                serde_json::from_slice(&bytes).context("parse detection frame json")?;
            let resp: IntakeOutcome = client
                .post(format!("{base}/v1/detections"))
                .json(&frame)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Cmd::Assign {
            incident_id,
            worker,
        } => {
            let body = serde_json::json!({
                "incident_id": incident_id,
                "worker_id": WorkerId::new(worker),
            });
            let resp: Incident = client
                .post(format!("{base}/v1/assignments"))
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Cmd::Complete {
            incident_id,
            worker,
            image,
        } => {
            let body = serde_json::json!({
                "incident_id": incident_id,
                "worker_id": WorkerId::new(worker),
                "image": EvidenceRef::new(image),
            });
            let resp: Incident = client
                .post(format!("{base}/v1/completions"))
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Cmd::Verify {
            incident_id,
            decision,
            note,
        } => {
            let body = serde_json::json!({
                "incident_id": incident_id,
                "decision": decision,
                "note": note,
            });
            let resp: Incident = client
                .post(format!("{base}/v1/verifications"))
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Cmd::List {
            status,
            kind,
            worker,
        } => {
            let mut req = client.get(format!("{base}/v1/incidents"));
            if let Some(s) = status {
                req = req.query(&[("status", s)]);
            }
            if let Some(k) = kind {
                req = req.query(&[("kind", k)]);
            }
            if let Some(w) = worker {
                req = req.query(&[("worker", w)]);
            }
            let resp: Vec<Incident> = req.send().await?.error_for_status()?.json().await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Cmd::Get { incident_id } => {
            let resp: Incident = client
                .get(format!("{base}/v1/incidents/{incident_id}"))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Cmd::Tasks { worker } => {
            let resp: Vec<Incident> = client
                .get(format!("{base}/v1/workers/{worker}/tasks"))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Cmd::Stats => {
            let resp: serde_json::Value = client
                .get(format!("{base}/v1/stats"))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
    }

    Ok(())
}
