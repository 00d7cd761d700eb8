use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(about = "Small institutional library: users, catalog, loans and late fees", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a student (limit 5 items, 14-day loans)
    RegisterStudent {
        user_id: String,
        name: String,
        email: String,
        password: String,
        age: u32,
        #[arg(long)]
        student_id: String,
        #[arg(long)]
        major: String,
        /// Academic year (1-4)
        #[arg(long)]
        year: u8,
    },

    /// Register a faculty member (limit 10 items, 30-day loans)
    RegisterFaculty {
        user_id: String,
        name: String,
        email: String,
        password: String,
        age: u32,
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        designation: String,
    },

    /// Register a librarian (limit 15 items, 60-day loans)
    RegisterLibrarian {
        user_id: String,
        name: String,
        email: String,
        password: String,
        age: u32,
        #[arg(long)]
        employee_id: String,
        /// Morning, Evening or Night
        #[arg(long)]
        shift: String,
    },

    /// Add a book to the catalog (late fee 0.50/day)
    AddBook {
        item_id: String,
        title: String,
        publisher: String,
        year: i32,
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        genre: String,
        #[arg(long)]
        pages: u32,
    },

    /// Add a magazine to the catalog (late fee 0.25/day)
    AddMagazine {
        item_id: String,
        title: String,
        publisher: String,
        year: i32,
        #[arg(long)]
        issue: u32,
        #[arg(long)]
        month: String,
        #[arg(long)]
        category: String,
    },

    /// Add a journal to the catalog (late fee 0.75/day)
    AddJournal {
        item_id: String,
        title: String,
        publisher: String,
        year: i32,
        #[arg(long)]
        volume: u32,
        #[arg(long)]
        field: String,
        #[arg(long)]
        editor: String,
        #[arg(long)]
        peer_reviewed: bool,
    },

    /// Check credentials for a user
    Login { user_id: String, password: String },

    /// List all registered users
    Users,

    /// List catalog items
    #[command(alias = "ls")]
    Items {
        /// Only items currently on the shelf
        #[arg(long)]
        available: bool,
    },

    /// Search the catalog by title substring or by type
    Search {
        /// Title fragment (case-insensitive)
        term: Option<String>,

        /// Exact item type: book, magazine or journal
        #[arg(long = "type")]
        item_type: Option<String>,
    },

    /// Borrow an item
    Borrow { user_id: String, item_id: String },

    /// Return an item; prints any late fee
    Return { user_id: String, item_id: String },

    /// List transactions, optionally for a single user
    #[command(alias = "tx")]
    Transactions {
        #[arg(long)]
        user: Option<String>,
    },

    /// Open loans past their due date
    Overdue,

    /// Borrowing activity and total fines for one user
    Activity { user_id: String },

    /// Aggregate counters
    Stats,

    /// Print the path of the data file
    Path,
}
