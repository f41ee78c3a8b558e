use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "podconfig-cli")]
#[command(about = "Management CLI for the podconfig feed editor", long_about = None)]
struct Cli {
    #[arg(short, long, env = "PODCONFIG_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the editor is up
    Health,
    /// List configured feeds
    List,
    /// Add a feed for a channel page URL
    Add {
        /// Channel page, handle or canonical URL
        source_url: String,
        #[arg(long)]
        update_period: Option<String>,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        keep_last: Option<i64>,
        #[arg(long)]
        max_age: Option<i64>,
    },
    /// Change settings of an existing feed
    Modify {
        key: String,
        #[arg(long)]
        update_period: Option<String>,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        quality: Option<String>,
        #[arg(long)]
        page_size: Option<i64>,
        #[arg(long)]
        keep_last: Option<i64>,
        #[arg(long)]
        max_age: Option<i64>,
        /// Replace nested tables instead of merging into them
        #[arg(long)]
        replace_nested: bool,
    },
    /// Remove a feed
    Remove { key: String },
    /// Show changes not yet picked up by podsync
    Changes,
    /// Restart podsync so it rereads its config
    Reload,
}

fn push(form: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<impl ToString>) {
    if let Some(v) = value {
        form.push((name, v.to_string()));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/').to_string();

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::List => client.get(format!("{}/feeds", base)).send().await?,
        Commands::Changes => client.get(format!("{}/changelog", base)).send().await?,
        Commands::Reload => client.post(format!("{}/reload", base)).send().await?,
        Commands::Remove { key } => {
            client
                .post(format!("{}/remove", base))
                .form(&[("feedKey", key)])
                .send()
                .await?
        }
        Commands::Add {
            source_url,
            update_period,
            format,
            keep_last,
            max_age,
        } => {
            let mut form = vec![("youtubeUrl", source_url)];
            push(&mut form, "update_period", update_period);
            push(&mut form, "format", format);
            push(&mut form, "clean_keep_last", keep_last);
            push(&mut form, "max_age", max_age);
            client.post(format!("{}/add", base)).form(&form).send().await?
        }
        Commands::Modify {
            key,
            update_period,
            format,
            quality,
            page_size,
            keep_last,
            max_age,
            replace_nested,
        } => {
            let mut form = vec![("feedKey", key)];
            push(&mut form, "update_period", update_period);
            push(&mut form, "format", format);
            push(&mut form, "quality", quality);
            push(&mut form, "page_size", page_size);
            push(&mut form, "clean_keep_last", keep_last);
            push(&mut form, "max_age", max_age);
            if replace_nested {
                form.push(("nested", "replace".to_string()));
            }
            client.post(format!("{}/modify", base)).form(&form).send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: podconfig returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
