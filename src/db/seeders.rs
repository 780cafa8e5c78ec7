//! Database seeders for built-in data
//!
//! Seeds the book catalog on startup so a fresh install has something to
//! browse. Existing rows are left untouched; only missing titles are inserted.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Seed the built-in book catalog (runs on every startup, inserts missing titles only)
pub async fn seed_catalog(pool: &SqlitePool) -> Result<()> {
    info!("Seeding built-in book catalog...");

    // Format: (title, author, description, cover, category, is_paid)
    let books: Vec<(&str, &str, &str, &str, &str, bool)> = vec![
        (
            "The Salt Road",
            "Mara Ellison",
            "A caravan crosses the high desert chasing a rumor of water and finds a city that maps forgot.",
            "/covers/the-salt-road.jpg",
            "Adventure",
            true,
        ),
        (
            "Letters from Arno",
            "Paul Brecht",
            "Two correspondents fall in love across a border that keeps moving between their letters.",
            "/covers/letters-from-arno.jpg",
            "Romance",
            false,
        ),
        (
            "The Ninth Caller",
            "Ines Duarte",
            "A late-night radio host realizes one of her regular callers is describing crimes before they happen.",
            "/covers/the-ninth-caller.jpg",
            "Thriller",
            true,
        ),
        (
            "What the Harbor Kept",
            "Tomas Lindqvist",
            "A shipwright looks back on forty years of boats, storms, and the people who never came home.",
            "/covers/what-the-harbor-kept.jpg",
            "Memoir",
            false,
        ),
        (
            "Slow Trains to Trieste",
            "Ada Keren",
            "Six months of regional railways, border towns, and the art of arriving late on purpose.",
            "/covers/slow-trains-to-trieste.jpg",
            "Travel",
            false,
        ),
        (
            "The Borrowed Hour",
            "Dr. Felix Mwangi",
            "A practical guide to sleep debt and how to pay it back without rearranging your whole life.",
            "/covers/the-borrowed-hour.jpg",
            "Health",
            true,
        ),
        (
            "Field Notes in Winter",
            "Sigrid Holm",
            "Poems written in the margins of a naturalist's notebook over one long northern winter.",
            "/covers/field-notes-in-winter.jpg",
            "Poetry",
            false,
        ),
        (
            "Ash and Embers",
            "Rosa Calvino",
            "Wood-fired cooking from a village oven: breads, roasts, and everything worth burning a little.",
            "/covers/ash-and-embers.jpg",
            "Cooking",
            true,
        ),
    ];

    let mut inserted = 0;
    for (title, author, description, cover, category, is_paid) in books {
        let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM books WHERE title = ?")
            .bind(title)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO books (id, client_id, title, author, description, cover, category, is_paid)
            VALUES (?, NULL, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(title)
        .bind(author)
        .bind(description)
        .bind(cover)
        .bind(category)
        .bind(is_paid)
        .execute(pool)
        .await?;
        inserted += 1;
    }

    if inserted > 0 {
        info!("Seeded {} catalog books", inserted);
    }
    Ok(())
}
