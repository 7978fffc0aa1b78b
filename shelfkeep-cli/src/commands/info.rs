//! Info command implementation

use anyhow::{Context, Result};
use shelfkeep_core::{find_isbn, read_metadata};

/// Display metadata of an EPUB file
pub fn info(input: &str, json: bool) -> Result<()> {
    let mut metadata =
        read_metadata(input).with_context(|| format!("Failed to read metadata from {}", input))?;

    if metadata.isbn.is_none() {
        metadata.isbn = find_isbn(input)
            .with_context(|| format!("Failed to scan {} for an ISBN", input))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("Title:       {}", metadata.title);
    if !metadata.creators.is_empty() {
        println!("Authors:     {}", metadata.creators.join(", "));
    }
    if let Some(language) = &metadata.language {
        println!("Language:    {}", language);
    }
    if let Some(publisher) = &metadata.publisher {
        println!("Publisher:   {}", publisher);
    }
    if let Some(date) = &metadata.date {
        println!("Date:        {}", date);
    }
    if let Some(isbn) = &metadata.isbn {
        println!("ISBN:        {}", isbn);
    }
    for identifier in &metadata.identifiers {
        println!("Identifier:  {}", identifier);
    }
    if let Some(desc) = &metadata.description {
        println!("Description: {}", desc);
    }

    Ok(())
}
