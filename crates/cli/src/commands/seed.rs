//! Seed the database with a demo catalog.
//!
//! Intended for development and demo environments. The command is a no-op
//! when the catalog already has products, so it is safe to re-run.

use tracing::{info, warn};

use kirana_api::db::{self, ProductRepository, UserRepository};
use kirana_api::models::ProductInput;
use kirana_core::{Email, Money};

/// One seed catalog entry: name, category, price, original price, stock.
type SeedProduct = (&'static str, &'static str, i64, Option<i64>, i32);

const CATALOG: &[SeedProduct] = &[
    ("Toor Dal 1kg", "Staples", 180, Some(210), 40),
    ("Basmati Rice 5kg", "Staples", 550, None, 25),
    ("A2 Cow Ghee 500ml", "Dairy", 650, Some(700), 12),
    ("Masala Chai 250g", "Beverages", 120, None, 60),
    ("Turmeric Powder 200g", "Spices", 85, None, 80),
    ("Jaggery Blocks 1kg", "Sweeteners", 90, None, 30),
    ("Coconut Oil 1L", "Oils", 240, Some(260), 18),
    // Deliberately out of stock: listed but not purchasable
    ("Steel Tiffin Box", "Kitchen", 350, None, 0),
];

/// Insert the demo catalog, owned by the given admin account.
///
/// # Errors
///
/// Returns an error if the admin account is missing or the database is
/// unreachable.
pub async fn catalog(admin_email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let admin_email = Email::parse(admin_email)?;

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let users = UserRepository::new(&pool);
    let admin = users
        .get_by_email(&admin_email)
        .await?
        .ok_or_else(|| format!("no account with email {admin_email}"))?;
    if !admin.is_admin {
        return Err(format!("{admin_email} is not an admin account").into());
    }

    let products = ProductRepository::new(&pool);
    let existing = products.list(&db::ProductFilter::default()).await?;
    if !existing.is_empty() {
        warn!(
            count = existing.len(),
            "Catalog already has products, nothing to do"
        );
        return Ok(());
    }

    let mut inserted = 0usize;
    for &(name, category, price, original_price, stock_count) in CATALOG {
        products
            .create(
                &ProductInput {
                    name: name.to_string(),
                    description: None,
                    price: Money::from_rupees(price),
                    original_price: original_price.map(Money::from_rupees),
                    image_url: None,
                    category: Some(category.to_string()),
                    stock_count,
                },
                admin.id,
            )
            .await?;
        inserted += 1;
    }

    info!(inserted, "Seeding complete");
    Ok(())
}
