use crate::formatter::MarkdownContent;
use crate::types::{
    InventoryReport, Repository, RepositoryInventory, RepositoryProblem, RestListing,
};

pub fn inventory_report_markdown(report: &InventoryReport) -> MarkdownContent {
    match report {
        InventoryReport::V3(listing) => rest_listing_markdown(listing),
        InventoryReport::V4(inventory) => repository_inventory_markdown(inventory),
    }
}

pub fn rest_listing_markdown(listing: &RestListing) -> MarkdownContent {
    let mut content = String::new();

    content.push_str(&format!("# {}\n", listing.scope.source_tag()));
    content.push_str(&format!(
        "Total {} | Requests {} | {}\n\n",
        listing.total(),
        listing.requests,
        listing.stop
    ));

    for repository in &listing.repositories {
        content.push_str(&repository_line(repository));
    }

    if !listing.problems.is_empty() {
        content.push_str("\n## Problem Repositories\n");
        content.push_str(&problems_markdown(&listing.problems));
    }

    MarkdownContent(content)
}

pub fn repository_inventory_markdown(inventory: &RepositoryInventory) -> MarkdownContent {
    let mut content = String::new();

    content.push_str(&format!(
        "# Repositories\n{} organizations, {} repositories\n",
        inventory.repositories.len(),
        inventory.total_repositories()
    ));

    for (organization, repositories) in &inventory.repositories {
        content.push_str(&format!("\n## {} ({})\n", organization, repositories.len()));
        if repositories.is_empty() {
            content.push_str("No repositories\n");
        }
        for repository in repositories {
            content.push_str(&repository_line(repository));
        }
    }

    if !inventory.failed.is_empty() {
        content.push_str("\n## Failed Organizations\n");
        for (organization, reason) in &inventory.failed {
            content.push_str(&format!("- {}: {}\n", organization, reason));
        }
    }

    MarkdownContent(content)
}

fn repository_line(repository: &Repository) -> String {
    let mut flags = Vec::new();
    if repository.is_private {
        flags.push("private");
    }
    if repository.is_fork {
        flags.push("fork");
    }
    if repository.is_archived {
        flags.push("archived");
    }
    if repository.is_locked {
        flags.push("locked");
    }
    if repository.is_disabled {
        flags.push("disabled");
    }

    let name = if repository.name_with_owner.is_empty() {
        "(no name)"
    } else {
        repository.name_with_owner.as_str()
    };

    let mut line = format!("- {}", name);
    if !flags.is_empty() {
        line.push_str(&format!(" [{}]", flags.join(", ")));
    }
    if repository.fork_count > 0 {
        line.push_str(&format!(" forks: {}", repository.fork_count));
    }
    if let Some(url) = &repository.url {
        line.push_str(&format!(" {}", url));
    }
    line.push('\n');
    line
}

fn problems_markdown(problems: &[RepositoryProblem]) -> String {
    problems
        .iter()
        .map(|problem| format!("- {}\n", problem))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository(name: &str) -> Repository {
        Repository {
            id: "R_1".to_string(),
            database_id: 1,
            name_with_owner: name.to_string(),
            description: None,
            url: Some(format!("https://ghe.example.com/{}", name)),
            is_private: true,
            is_fork: false,
            is_archived: true,
            is_locked: false,
            is_disabled: false,
            fork_count: 2,
        }
    }

    #[test]
    fn test_repository_inventory_markdown() {
        let mut inventory = RepositoryInventory::default();
        inventory.insert_repositories("acme", vec![repository("acme/widgets")]);
        inventory.insert_repositories("beta", Vec::new());
        inventory.insert_failure("gamma", "query failed: boom".to_string());

        let markdown = repository_inventory_markdown(&inventory).0;
        assert!(markdown.contains("2 organizations, 1 repositories"));
        assert!(markdown.contains(
            "- acme/widgets [private, archived] forks: 2 https://ghe.example.com/acme/widgets"
        ));
        assert!(markdown.contains("## beta (0)\nNo repositories\n"));
        assert!(markdown.contains("## Failed Organizations\n- gamma: query failed: boom"));
    }
}
