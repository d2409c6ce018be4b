//! Category CLI commands

use clap::Subcommand;

use super::find_category;
use crate::error::BudgetResult;
use crate::models::{Category, CategoryId, CategoryTree};
use crate::storage::Repository;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a category, optionally under a parent
    Add {
        /// Category name
        name: String,
        /// Parent category name or ID
        #[arg(short, long)]
        parent: Option<String>,
        /// Position among siblings
        #[arg(long, default_value = "0")]
        sort_order: i32,
    },

    /// Show the category hierarchy
    List,
}

/// Handle a category command
pub fn handle_category_command<R: Repository>(repo: &R, cmd: CategoryCommands) -> BudgetResult<()> {
    match cmd {
        CategoryCommands::Add {
            name,
            parent,
            sort_order,
        } => {
            let categories = repo.list_categories()?;
            let category = match parent {
                Some(parent) => {
                    let parent = find_category(&categories, &parent)?;
                    Category::child_of(name, parent.id)
                }
                None => Category::new(name),
            }
            .with_sort_order(sort_order);

            repo.upsert_category(category.clone())?;
            println!("Created category: {}", category.name);
            println!("  ID: {}", category.id.short());
        }

        CategoryCommands::List => {
            let categories = repo.list_categories()?;
            if categories.is_empty() {
                println!("No categories yet. Add one with 'budget category add <name>'.");
                return Ok(());
            }

            let tree = repo.category_tree()?;
            for root in tree.roots() {
                print_subtree(&tree, &categories, root, 0);
            }
        }
    }

    Ok(())
}

fn print_subtree(tree: &CategoryTree, categories: &[Category], id: CategoryId, depth: usize) {
    if let Some(category) = categories.iter().find(|c| c.id == id) {
        println!("{}{}  ({})", "  ".repeat(depth), category.name, id.short());
    }
    for child in tree.children(id) {
        print_subtree(tree, categories, child, depth + 1);
    }
}
