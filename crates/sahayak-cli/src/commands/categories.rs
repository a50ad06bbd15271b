//! Category listing commands

use std::path::Path;

use anyhow::Result;

use sahayak_core::models::Category;

use super::load_knowledge;

pub fn cmd_categories(knowledge: Option<&Path>, name: Option<&str>) -> Result<()> {
    let (kb, lexicon) = load_knowledge(knowledge)?;

    let Some(name) = name else {
        println!("📋 Categories");
        for category in Category::ALL {
            let schemes = kb.get(category).map(|r| r.schemes.len()).unwrap_or(0);
            println!("   {:<16} {} schemes", category.to_string(), schemes);
        }
        return Ok(());
    };

    let category: Category = name.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let Some(record) = kb.get(category) else {
        println!("No scheme data available for *{}* yet.", category);
        return Ok(());
    };

    println!("📋 Schemes for {}", category);
    for scheme in &record.schemes {
        println!("   • {}", scheme);
    }
    println!();
    println!("   Amount: {}", record.amount);
    println!("   Apply:  {}", record.apply);
    println!("   Dates:  {}", record.date);

    if !record.alerts.is_empty() {
        println!();
        println!("   Alerts:");
        for alert in &record.alerts {
            println!("   {}", alert);
        }
    }

    if let Some(keywords) = lexicon.keywords(category) {
        println!();
        println!("   Matched by: {}", keywords.join(", "));
    }

    Ok(())
}
