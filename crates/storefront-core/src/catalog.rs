use storefront_types::domain::product::Product;

/// Read-only product source. The order store never mutates catalog data; it
/// only copies products into cart lines.
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The built-in demo assortment. Prices are kip amounts.
    pub fn demo() -> Self {
        Self::with_products(demo_products())
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Category filter values in catalog order, deduplicated, with the
    /// "All" pseudo-category first.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec!["All".to_string()];
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }
}

fn demo_products() -> Vec<Product> {
    fn product(
        id: &str,
        name: &str,
        description: &str,
        price_cents: i64,
        image: &str,
        category: &str,
        stock: u32,
        rating: f32,
        reviews: u32,
    ) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price_cents,
            image: image.into(),
            category: category.into(),
            stock,
            rating,
            reviews,
        }
    }

    vec![
        product(
            "1",
            "iPhone 15 Pro",
            "Latest from Apple with A17 Pro chip and new camera system",
            24_990_000,
            "https://images.unsplash.com/photo-1592750475338-74b7b21085ab?w=500&h=500&fit=crop",
            "Mobile Phones",
            15,
            4.8,
            342,
        ),
        product(
            "2",
            "MacBook Pro 14\"",
            "Professional laptop with M3 Pro chip for creative professionals",
            43_500_000,
            "https://images.unsplash.com/photo-1541807084-5c52b6b3adef?w=500&h=500&fit=crop",
            "Computers",
            8,
            4.9,
            156,
        ),
        product(
            "3",
            "iPad Air",
            "Powerful tablet for creative work and entertainment",
            13_200_000,
            "https://images.unsplash.com/photo-1544244015-0df4b3ffc6b0?w=500&h=500&fit=crop",
            "Tablets",
            12,
            4.7,
            289,
        ),
        product(
            "4",
            "AirPods Pro 2",
            "Wireless earbuds with advanced noise cancellation technology",
            5_400_000,
            "https://images.unsplash.com/photo-1572569511254-d8f925fe2cbb?w=500&h=500&fit=crop",
            "Headphones",
            25,
            4.6,
            478,
        ),
        product(
            "5",
            "Apple Watch Series 9",
            "Smart watch that helps take care of your health",
            9_100_000,
            "https://images.unsplash.com/photo-1434494878577-86c23bcb06b9?w=500&h=500&fit=crop",
            "Watches",
            18,
            4.5,
            367,
        ),
        product(
            "6",
            "Samsung Galaxy S24",
            "Flagship smartphone with cutting-edge AI technology",
            18_700_000,
            "https://images.unsplash.com/photo-1610945265064-0e34e5519bbf?w=500&h=500&fit=crop",
            "Mobile Phones",
            20,
            4.4,
            234,
        ),
        product(
            "7",
            "Sony WH-1000XM5",
            "Premium wireless headphones with industry-leading noise cancellation",
            7_800_000,
            "https://images.unsplash.com/photo-1546435770-a3e426bf472b?w=500&h=500&fit=crop",
            "Headphones",
            14,
            4.7,
            198,
        ),
        product(
            "8",
            "Nintendo Switch OLED",
            "Portable gaming console with vibrant OLED display",
            7_200_000,
            "https://images.unsplash.com/photo-1606144042614-b2417e99c4e3?w=500&h=500&fit=crop",
            "Gaming",
            22,
            4.6,
            445,
        ),
    ]
}
