use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use libris::api::LibraryApi;
use libris::clock::SystemClock;
use libris::config::LibrisConfig;
use libris::error::{LibrisError, Result};
use libris::model::{ItemType, LibraryItem, Person};
use libris::persist;
use std::path::PathBuf;

mod args;
mod print;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: LibraryApi<SystemClock>,
    data_file: PathBuf,
    config: LibrisConfig,
}

impl AppContext {
    fn save(&self) -> Result<()> {
        persist::save_to_path(&self.data_file, self.api.registry())
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context()?;

    if cli.verbose {
        eprintln!("{} {}", "data file:".dimmed(), ctx.data_file.display());
    }

    match cli.command {
        Commands::RegisterStudent {
            user_id,
            name,
            email,
            password,
            age,
            student_id,
            major,
            year,
        } => {
            let display = name.clone();
            ctx.api.register_user(Person::student(
                user_id, name, email, password, age, student_id, major, year,
            ))?;
            ctx.save()?;
            println!("{}", format!("Registered student {display}").green());
        }
        Commands::RegisterFaculty {
            user_id,
            name,
            email,
            password,
            age,
            employee_id,
            department,
            designation,
        } => {
            let display = name.clone();
            ctx.api.register_user(Person::faculty(
                user_id,
                name,
                email,
                password,
                age,
                employee_id,
                department,
                designation,
            ))?;
            ctx.save()?;
            println!("{}", format!("Registered faculty {display}").green());
        }
        Commands::RegisterLibrarian {
            user_id,
            name,
            email,
            password,
            age,
            employee_id,
            shift,
        } => {
            let display = name.clone();
            ctx.api.register_user(Person::librarian(
                user_id, name, email, password, age, employee_id, shift,
            ))?;
            ctx.save()?;
            println!("{}", format!("Registered librarian {display}").green());
        }
        Commands::AddBook {
            item_id,
            title,
            publisher,
            year,
            isbn,
            author,
            genre,
            pages,
        } => {
            let display = title.clone();
            ctx.api.add_item(LibraryItem::book(
                item_id, title, publisher, year, isbn, author, genre, pages,
            ))?;
            ctx.save()?;
            println!("{}", format!("Added book {display}").green());
        }
        Commands::AddMagazine {
            item_id,
            title,
            publisher,
            year,
            issue,
            month,
            category,
        } => {
            let display = title.clone();
            ctx.api.add_item(LibraryItem::magazine(
                item_id, title, publisher, year, issue, month, category,
            ))?;
            ctx.save()?;
            println!("{}", format!("Added magazine {display}").green());
        }
        Commands::AddJournal {
            item_id,
            title,
            publisher,
            year,
            volume,
            field,
            editor,
            peer_reviewed,
        } => {
            let display = title.clone();
            ctx.api.add_item(LibraryItem::journal(
                item_id,
                title,
                publisher,
                year,
                volume,
                field,
                editor,
                peer_reviewed,
            ))?;
            ctx.save()?;
            println!("{}", format!("Added journal {display}").green());
        }
        Commands::Login { user_id, password } => {
            let user = ctx.api.authenticate(&user_id, &password)?;
            println!("Welcome, {} ({})", user.name.bold(), user.role());
        }
        Commands::Users => print::print_users(&ctx.api.list_users()),
        Commands::Items { available } => print::print_items(&ctx.api.list_items(available)),
        Commands::Search { term, item_type } => {
            let results = match (term, item_type) {
                (_, Some(kind)) => ctx.api.search_by_type(kind.parse::<ItemType>()?),
                (Some(term), None) => ctx.api.search_by_title(&term),
                (None, None) => {
                    return Err(LibrisError::InvalidOperation(
                        "Provide a title fragment or --type".to_string(),
                    ))
                }
            };
            print::print_items(&results);
        }
        Commands::Borrow { user_id, item_id } => {
            let tx = ctx.api.borrow_item(&user_id, &item_id)?;
            ctx.save()?;
            println!("{}", "Item borrowed.".green());
            println!("Due date: {}", tx.due_date.format("%Y-%m-%d %H:%M"));
        }
        Commands::Return { user_id, item_id } => {
            let fine = ctx.api.return_item(&user_id, &item_id)?;
            ctx.save()?;
            println!("{}", "Item returned.".green());
            if fine > 0.0 {
                println!(
                    "{}",
                    format!("Late fee: {}{fine:.2}", ctx.config.currency).yellow()
                );
            } else {
                println!("No late fee.");
            }
        }
        Commands::Transactions { user } => {
            let transactions = ctx.api.list_transactions(user.as_deref());
            print::print_transactions(&transactions, ctx.api.now());
        }
        Commands::Overdue => print::print_overdue(&ctx.api.overdue_report()),
        Commands::Activity { user_id } => {
            let activity = ctx.api.user_activity(&user_id)?;
            print::print_activity(&activity, &ctx.config.currency);
        }
        Commands::Stats => print::print_stats(&ctx.api.stats()),
        Commands::Path => println!("{}", ctx.data_file.display()),
    }

    Ok(())
}

fn init_context() -> Result<AppContext> {
    let data_dir = resolve_data_dir()?;
    let config = LibrisConfig::load(&data_dir)?;
    let data_file = config.data_file_path(&data_dir);
    let registry = persist::load_from_path(&data_file)?;
    Ok(AppContext {
        api: LibraryApi::new(registry, SystemClock),
        data_file,
        config,
    })
}

fn resolve_data_dir() -> Result<PathBuf> {
    // Test runs point LIBRIS_HOME at a temp dir.
    if let Ok(home) = std::env::var("LIBRIS_HOME") {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("", "", "libris")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            LibrisError::InvalidOperation("Could not determine a data directory".to_string())
        })
}
