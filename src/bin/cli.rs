//! jobtrack CLI
//!
//! Command-line client for a running jobtrack API server:
//! - Register, log in and out
//! - Add, list, search, update and delete job applications
//! - Show dashboard statistics

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track your job applications from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true, env = "JOBTRACK_API_URL")]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Register {
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        phone: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "JOBTRACK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Log in and store the session token
    Login {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "JOBTRACK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Revoke the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Add a job application
    Add {
        company: String,
        position: String,
        /// Applied, Interviewing, Offer or Rejected
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Interview date (YYYY-MM-DD)
        #[arg(long)]
        interview_date: Option<String>,
    },

    /// List job applications, newest first
    List {
        /// Prefix search over company and position
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show one job application
    Show { id: String },

    /// Update a job application
    Update {
        id: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Remove the notes
        #[arg(long, conflicts_with = "notes")]
        clear_notes: bool,
        #[arg(long)]
        interview_date: Option<String>,
    },

    /// Delete a job application
    Delete { id: String },

    /// Show dashboard statistics
    Stats,

    /// Generate default server config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let api = ApiClient::new(&cli.api_url);
    let json_output = cli.format == "json";

    match cli.command {
        Commands::Register {
            email,
            full_name,
            username,
            phone,
            dob,
            address,
            password,
        } => {
            let (password, confirm) = new_password(password, prompt)?;
            let body = json!({
                "email": email,
                "password": password,
                "confirm_password": confirm,
                "full_name": full_name,
                "username": username,
                "phone_number": phone,
                "date_of_birth": dob,
                "address": address,
            });

            let session = api.send(api.post("/auth/register").json(&body)).await?;
            save_token(&session)?;
            println!("Registered and logged in as {}", session["user"]["email"].as_str().unwrap_or("-"));
        }

        Commands::Login { email, password } => {
            let password = password_or_prompt(password, "Password")?;
            let body = json!({ "email": email, "password": password });

            let session = api.send(api.post("/auth/login").json(&body)).await?;
            save_token(&session)?;
            println!("Logged in as {}", email);
        }

        Commands::Logout => {
            let token = load_token()?;
            api.send(api.post("/auth/logout").bearer_auth(&token)).await?;
            std::fs::remove_file(token_path()?)?;
            println!("Logged out");
        }

        Commands::Whoami => {
            let token = load_token()?;
            let user = api.send(api.get("/me").bearer_auth(&token)).await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                for (label, key) in [
                    ("Name", "full_name"),
                    ("Username", "username"),
                    ("Email", "email"),
                    ("Phone", "phone_number"),
                    ("Date of birth", "date_of_birth"),
                    ("Address", "address"),
                ] {
                    println!("{:<14} {}", label, user[key].as_str().unwrap_or("N/A"));
                }
            }
        }

        Commands::Add {
            company,
            position,
            status,
            notes,
            interview_date,
        } => {
            let token = load_token()?;
            let body = json!({
                "company": company,
                "position": position,
                "status": status,
                "notes": notes,
                "interview_date": interview_date,
            });

            let job = api.send(api.post("/jobs").bearer_auth(&token).json(&body)).await?;
            println!("Job application added! ({})", job["id"].as_str().unwrap_or("-"));
        }

        Commands::List { query } => {
            let token = load_token()?;
            let mut request = api.get("/jobs").bearer_auth(&token);
            if let Some(q) = &query {
                request = request.query(&[("q", q)]);
            }

            let data = api.send(request).await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_jobs(data["jobs"].as_array().map(Vec::as_slice).unwrap_or(&[]));
            }
        }

        Commands::Show { id } => {
            let token = load_token()?;
            let job = api.send(api.get(&format!("/jobs/{}", id)).bearer_auth(&token)).await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&job)?);
            } else {
                print_job_detail(&job);
            }
        }

        Commands::Update {
            id,
            company,
            position,
            status,
            notes,
            clear_notes,
            interview_date,
        } => {
            let token = load_token()?;
            let mut body = serde_json::Map::new();
            if let Some(company) = company {
                body.insert("company".into(), json!(company));
            }
            if let Some(position) = position {
                body.insert("position".into(), json!(position));
            }
            if let Some(status) = status {
                body.insert("status".into(), json!(status));
            }
            if let Some(notes) = notes {
                body.insert("notes".into(), json!(notes));
            } else if clear_notes {
                body.insert("notes".into(), Value::Null);
            }
            if let Some(date) = interview_date {
                body.insert("interview_date".into(), json!(date));
            }
            if body.is_empty() {
                bail!("Nothing to update");
            }

            let job = api
                .send(api.put(&format!("/jobs/{}", id)).bearer_auth(&token).json(&body))
                .await?;
            println!(
                "Updated {} at {} ({})",
                job["position"].as_str().unwrap_or("-"),
                job["company"].as_str().unwrap_or("-"),
                job["status"].as_str().unwrap_or("-")
            );
        }

        Commands::Delete { id } => {
            let token = load_token()?;
            api.send(api.delete(&format!("/jobs/{}", id)).bearer_auth(&token))
                .await?;
            println!("Deleted {}", id);
        }

        Commands::Stats => {
            let token = load_token()?;
            let stats = api.send(api.get("/dashboard").bearer_auth(&token)).await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }

        Commands::Config { output } => {
            let config = jobtrack::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Thin wrapper over reqwest for the `/api/v1` routes
struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    fn new(api_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/api/v1", api_url.trim_end_matches('/')),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(format!("{}{}", self.base_url, path))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(format!("{}{}", self.base_url, path))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(format!("{}{}", self.base_url, path))
    }

    /// Send a request and decode the JSON body, turning API errors into messages
    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.with_context(|| {
            format!(
                "Cannot connect to jobtrack API at {} (is `jobtrack` running?)",
                self.base_url
            )
        })?;
        decode(response).await
    }
}

async fn decode(response: Response) -> Result<Value> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    if status.is_success() {
        return Ok(body);
    }

    if status == StatusCode::UNAUTHORIZED && body["error"]["code"] == "UNAUTHORIZED" {
        bail!("Not logged in. Run `jobtrack-cli login <email>` first.");
    }
    let message = body["error"]["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());
    bail!("{}", message)
}

fn token_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("No config directory for this platform")?;
    Ok(dir.join("jobtrack").join("session"))
}

fn save_token(session: &Value) -> Result<()> {
    let token = session["token"]
        .as_str()
        .context("Server response did not include a session token")?;
    let path = token_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, token).with_context(|| format!("writing {:?}", path))?;
    Ok(())
}

fn load_token() -> Result<String> {
    let path = token_path()?;
    match std::fs::read_to_string(&path) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => bail!("Not logged in. Run `jobtrack-cli login <email>` first."),
    }
}

fn password_or_prompt(password: Option<String>, label: &str) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => prompt(label),
    }
}

/// Password plus its confirmation; only a prompted password is asked twice
fn new_password(
    given: Option<String>,
    mut ask: impl FnMut(&str) -> Result<String>,
) -> Result<(String, String)> {
    match given {
        Some(p) => Ok((p.clone(), p)),
        None => {
            let password = ask("Password")?;
            let confirm = ask("Confirm password")?;
            Ok((password, confirm))
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_jobs(jobs: &[Value]) {
    if jobs.is_empty() {
        println!("No job applications yet.");
        println!();
        println!("Add your first one with:");
        println!("  jobtrack-cli add \"Acme\" \"Engineer\"");
        return;
    }

    println!(
        "{:<36}  {:<20} {:<24} {:<13} {}",
        "ID", "Company", "Position", "Status", "Applied"
    );
    println!("{}", "-".repeat(110));
    for job in jobs {
        println!(
            "{:<36}  {:<20} {:<24} {:<13} {}",
            job["id"].as_str().unwrap_or("-"),
            truncate(job["company"].as_str().unwrap_or("-"), 20),
            truncate(job["position"].as_str().unwrap_or("-"), 24),
            job["status"].as_str().unwrap_or("-"),
            short_date(&job["created_at"])
        );
    }
}

fn print_job_detail(job: &Value) {
    println!("{} at {}", job["position"].as_str().unwrap_or("-"), job["company"].as_str().unwrap_or("-"));
    println!("  Status:    {}", job["status"].as_str().unwrap_or("-"));
    println!("  Applied:   {}", short_date(&job["created_at"]));
    if let Some(date) = job["interview_date"].as_str() {
        println!("  Interview: {}", date);
    }
    if let Some(notes) = job["notes"].as_str() {
        println!("  Notes:     {}", notes);
    }
}

fn print_stats(stats: &Value) {
    println!("Applications by status");
    for entry in stats["applications_by_status"].as_array().into_iter().flatten() {
        println!(
            "  {:<13} {}",
            entry["status"].as_str().unwrap_or("-"),
            entry["count"].as_u64().unwrap_or(0)
        );
    }

    println!();
    println!("Upcoming interviews");
    let interviews = stats["upcoming_interviews"].as_array().map(Vec::as_slice).unwrap_or(&[]);
    if interviews.is_empty() {
        println!("  No upcoming interviews.");
    }
    for job in interviews {
        println!(
            "  {} at {} (applied {})",
            job["position"].as_str().unwrap_or("-"),
            job["company"].as_str().unwrap_or("-"),
            short_date(&job["created_at"])
        );
        if let Some(notes) = job["notes"].as_str() {
            println!("    {}", notes);
        }
    }

    println!();
    println!("Recent activity");
    for job in stats["recent_activities"].as_array().into_iter().flatten() {
        println!(
            "  {} - {} at {}",
            job["status"].as_str().unwrap_or("-"),
            job["position"].as_str().unwrap_or("-"),
            job["company"].as_str().unwrap_or("-")
        );
    }
}

fn short_date(value: &Value) -> String {
    value
        .as_str()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_given_password_is_not_confirmed_interactively() {
        let (password, confirm) = new_password(Some("hunter22".to_string()), |label| {
            panic!("unexpected prompt: {}", label)
        })
        .unwrap();
        assert_eq!(password, "hunter22");
        assert_eq!(confirm, "hunter22");
    }

    #[test]
    fn test_prompted_password_asks_for_confirmation() {
        let mut asked = Vec::new();
        let (password, confirm) = new_password(None, |label| {
            asked.push(label.to_string());
            Ok(format!("{}-answer", asked.len()))
        })
        .unwrap();
        assert_eq!(asked, vec!["Password", "Confirm password"]);
        assert_eq!(password, "1-answer");
        assert_eq!(confirm, "2-answer");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Acme", 10), "Acme");
        assert_eq!(truncate("Acme Corporation", 5), "Acme…");
    }
}
