//! Example 01: Basic Usage
//!
//! This example demonstrates adding, toggling, editing, filtering and
//! removing tasks with TodoStore.
//!
//! Run with: cargo run --example 01_basic_usage

use eyre::Result;
use todostore::{Filter, TaskStore};

fn print_view(store: &TaskStore) {
    println!("   View ({}):", store.filter());
    let tasks = store.list();
    if tasks.is_empty() {
        println!("   (no tasks to show)");
    }
    for task in &tasks {
        let mark = if task.completed { "x" } else { " " };
        println!("   [{}] {} : {}", mark, task.id, task.text);
    }

    let stats = store.stats();
    println!(
        "   total={} completed={} pending={}\n",
        stats.total, stats.completed, stats.pending
    );
}

fn main() -> Result<()> {
    println!("TodoStore Basic Usage Example");
    println!("=============================\n");

    let mut store = TaskStore::new();

    // ADD
    println!("1. ADD - Adding two tasks...");
    let milk = store.add("Buy milk")?;
    let dog = store.add("  Walk dog  ")?;
    println!("   Created tasks {} and {}\n", milk.id, dog.id);

    // VALIDATION
    println!("2. VALIDATION - Adding an empty task...");
    match store.add("   ") {
        Ok(task) => println!("   Unexpectedly created task {}", task.id),
        Err(e) => println!("   Rejected: {}\n", e),
    }

    // TOGGLE
    println!("3. TOGGLE - Completing task {}...", milk.id);
    store.toggle(milk.id)?;
    print_view(&store);

    // FILTER
    println!("4. FILTER - Showing completed tasks only...");
    store.set_filter(Filter::Completed);
    print_view(&store);

    // EDIT
    println!("5. EDIT - Renaming task {}...", dog.id);
    store.edit(dog.id, "Walk the dog twice")?;
    store.set_filter(Filter::All);
    print_view(&store);

    // REMOVE
    println!("6. REMOVE - Removing task {} (twice)...", dog.id);
    store.remove(dog.id);
    store.remove(dog.id);
    print_view(&store);

    println!("Example complete!");
    Ok(())
}
