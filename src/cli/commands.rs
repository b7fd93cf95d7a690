use std::io::{self, BufRead, Write};

use clap::Parser;

use context_memory::{MemoryConfig, Metadata, SessionManager};

#[derive(Parser)]
#[command(name = "context-memory")]
#[command(about = "Interactive shell over an in-memory conversation context store")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Start a shell with a generated project id
    context-memory

    # Resume a named project id with a smaller store
    context-memory --project-id demo42 --max-entries 50

SHELL COMMANDS:
    /add <type> <text>   Store text under a type tag (use "general" for none)
    /query <prompt>      Retrieve the most relevant stored texts
    /recent [n]          Show the n most recent entries, newest first
    /type <tag>          Show all entries with the given type tag
    /stats               Show store statistics
    /export              Dump the store as pretty-printed JSON
    /clear               Drop all entries
    /help                Show this command list
    exit                 Quit
"#)]
pub struct Cli {
    /// Project/session identifier (generated when omitted)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Bound on the number of retained entries
    #[arg(long, default_value_t = 100)]
    pub max_entries: usize,

    /// Number of results returned by /query
    #[arg(long, default_value_t = 5)]
    pub results: usize,
}

/// Runs the interactive loop over one project session until `exit` or EOF.
pub fn run_shell(cli: &Cli) -> anyhow::Result<()> {
    let manager = SessionManager::with_config(MemoryConfig {
        max_entries: cli.max_entries,
    });
    let project_id = manager.open(cli.project_id.as_deref());

    println!("context-memory shell");
    println!("project id: {project_id}");
    println!("type /help for commands, exit to quit\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        if let Err(e) = dispatch(&manager, &project_id, cli.results, line) {
            eprintln!("error: {e}");
        }
    }

    manager.close(&project_id);
    Ok(())
}

fn dispatch(
    manager: &SessionManager,
    project_id: &str,
    results: usize,
    line: &str,
) -> anyhow::Result<()> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/add" => {
            let (tag, text) = match rest.split_once(char::is_whitespace) {
                Some((tag, text)) => (tag, text.trim()),
                None => ("", ""),
            };
            if text.is_empty() {
                println!("usage: /add <type> <text>");
                return Ok(());
            }
            let mut metadata = Metadata::new();
            metadata.insert("type".into(), serde_json::Value::from(tag));
            manager.with_store_mut(project_id, |store| store.add_with_metadata(text, metadata))?;
            println!("stored 1 entry ({tag})");
        }
        "/query" => {
            if rest.is_empty() {
                println!("usage: /query <prompt>");
                return Ok(());
            }
            let hits = manager.with_store(project_id, |store| store.query(rest, results))?;
            if hits.is_empty() {
                println!("no relevant context");
            }
            for (i, text) in hits.iter().enumerate() {
                println!("{}. {text}", i + 1);
            }
        }
        "/recent" => {
            let n = rest.parse::<usize>().unwrap_or(5);
            let texts = manager.with_store(project_id, |store| store.get_recent(n))?;
            for text in &texts {
                println!("- {text}");
            }
        }
        "/type" => {
            if rest.is_empty() {
                println!("usage: /type <tag>");
                return Ok(());
            }
            let texts = manager.with_store(project_id, |store| store.get_by_type(rest))?;
            for text in &texts {
                println!("- {text}");
            }
        }
        "/stats" => {
            let (len, is_empty) =
                manager.with_store(project_id, |store| (store.len(), store.is_empty()))?;
            println!("project:  {project_id}");
            println!("entries:  {len}");
            println!("empty:    {is_empty}");
        }
        "/export" => {
            let json = manager.with_store(project_id, |store| store.to_json(true))??;
            println!("{json}");
        }
        "/clear" => {
            manager.with_store_mut(project_id, |store| store.clear())?;
            println!("cleared");
        }
        "/help" => {
            println!("/add <type> <text>   store text under a type tag");
            println!("/query <prompt>      retrieve relevant context");
            println!("/recent [n]          newest entries first");
            println!("/type <tag>          entries with a type tag");
            println!("/stats               store statistics");
            println!("/export              dump store as JSON");
            println!("/clear               drop all entries");
            println!("exit                 quit");
        }
        _ => {
            println!("unknown command: {command} (try /help)");
        }
    }
    Ok(())
}
