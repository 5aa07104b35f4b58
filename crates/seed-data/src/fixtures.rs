//! Product records to seed: the built-in sample catalog or a JSON file.

use std::path::{Path, PathBuf};

use thiserror::Error;

use catalog::ProductRecord;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read records file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid records file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn product(
    name: &str,
    description: &str,
    price: f64,
    compare_price: f64,
    image: &str,
    category: &str,
    inventory_count: u32,
) -> ProductRecord {
    ProductRecord {
        name: name.to_string(),
        description: description.to_string(),
        price,
        compare_price: Some(compare_price),
        images: vec![image.to_string()],
        category: category.to_string(),
        inventory_count,
        is_active: true,
    }
}

/// The default sample catalog, in submission order.
pub fn sample_products() -> Vec<ProductRecord> {
    vec![
        product(
            "Luxury Wireless Headphones",
            "Premium noise-cancelling wireless headphones with exceptional sound quality and comfort. Features advanced active noise cancellation, 30-hour battery life, and premium materials.",
            299.99,
            399.99,
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=800",
            "Electronics",
            25,
        ),
        product(
            "Elegant Smart Watch",
            "Sophisticated smartwatch with health monitoring and elegant design. Track your fitness, monitor heart rate, and stay connected with style.",
            449.99,
            599.99,
            "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=800",
            "Electronics",
            18,
        ),
        product(
            "Premium Leather Wallet",
            "Handcrafted genuine leather wallet with multiple card slots and RFID protection. Made from premium Italian leather.",
            89.99,
            129.99,
            "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=800",
            "Accessories",
            32,
        ),
        product(
            "Luxury Home Fragrance",
            "Premium scented candles with long-lasting fragrance and elegant packaging. Hand-poured with natural wax.",
            45.99,
            65.99,
            "https://images.unsplash.com/photo-1602874801000-b9263cfe1001?w=800",
            "Home",
            41,
        ),
        product(
            "Premium Yoga Mat",
            "Eco-friendly premium yoga mat with superior grip and cushioning. Made from natural rubber and cork.",
            79.99,
            99.99,
            "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=800",
            "Fitness",
            28,
        ),
        product(
            "Wireless Phone Charger",
            "Fast wireless charging pad compatible with all Qi-enabled devices. Features sleek design and fast charging.",
            34.99,
            49.99,
            "https://images.unsplash.com/photo-1592899677977-9c10ca588bbd?w=800",
            "Electronics",
            55,
        ),
        product(
            "Designer Sunglasses",
            "UV400 protection designer sunglasses with premium frames and polarized lenses. Handcrafted acetate frames.",
            189.99,
            249.99,
            "https://images.unsplash.com/photo-1572635196237-14b3f281503f?w=800",
            "Accessories",
            15,
        ),
        product(
            "Premium Coffee Grinder",
            "Precision coffee grinder with multiple grind settings for perfect brewing. Burr grinder with 40mm stainless steel burrs.",
            159.99,
            199.99,
            "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=800",
            "Home",
            22,
        ),
    ]
}

/// Loads records from a JSON array. File order is submission order.
pub fn load_records(path: &Path) -> Result<Vec<ProductRecord>, FixtureError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| FixtureError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
