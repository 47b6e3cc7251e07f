//! Test product generation.
//!
//! Categories, names, and brands mirror the demo catalog the search index is
//! seeded with; text fields stay Korean because the embedding model is
//! multilingual and the downstream demo queries are Korean.

use serde::{Deserialize, Serialize};

pub const CATEGORIES: [&str; 7] = [
    "ELECTRONICS",
    "FASHION",
    "FOOD",
    "BEAUTY",
    "SPORTS",
    "HOME",
    "BOOKS",
];

const PRODUCTS_BY_CATEGORY: [(&str, [&str; 10]); 7] = [
    (
        "ELECTRONICS",
        [
            "스마트폰", "노트북", "태블릿", "이어폰", "충전기", "스마트워치", "모니터", "키보드",
            "마우스", "스피커",
        ],
    ),
    (
        "FASHION",
        [
            "운동화", "청바지", "티셔츠", "원피스", "자켓", "코트", "스니커즈", "백팩", "모자",
            "선글라스",
        ],
    ),
    (
        "FOOD",
        [
            "과자", "라면", "커피", "음료", "과일", "고기", "샐러드", "빵", "초콜릿", "견과류",
        ],
    ),
    (
        "BEAUTY",
        [
            "로션", "선크림", "립스틱", "파운데이션", "마스크팩", "샴푸", "향수", "아이크림",
            "토너", "세럼",
        ],
    ),
    (
        "SPORTS",
        [
            "요가매트", "덤벨", "러닝화", "스포츠웨어", "자전거", "테니스라켓", "축구공",
            "수영복", "골프채", "배드민턴",
        ],
    ),
    (
        "HOME",
        [
            "쿠션", "이불", "조명", "수납함", "커튼", "러그", "식기세트", "냄비", "후라이팬",
            "청소기",
        ],
    ),
    (
        "BOOKS",
        [
            "소설", "자기계발", "경제", "역사", "과학", "에세이", "만화", "요리책", "여행",
            "외국어",
        ],
    ),
];

const BRANDS_BY_CATEGORY: [(&str, [&str; 5]); 7] = [
    ("ELECTRONICS", ["삼성", "애플", "LG", "소니", "로지텍"]),
    ("FASHION", ["나이키", "아디다스", "유니클로", "자라", "H&M"]),
    ("FOOD", ["농심", "오뚜기", "CJ", "롯데", "동원"]),
    (
        "BEAUTY",
        ["아모레퍼시픽", "LG생활건강", "로레알", "에스티로더", "이니스프리"],
    ),
    (
        "SPORTS",
        ["나이키", "아디다스", "언더아머", "뉴발란스", "푸마"],
    ),
    ("HOME", ["이케아", "무인양품", "한샘", "까사미아", "리바트"]),
    (
        "BOOKS",
        ["민음사", "창비", "문학동네", "위즈덤하우스", "알에이치코리아"],
    ),
];

/// A generated product record destined for the search index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: u32,
    pub stock: u32,
    pub description: String,
}

impl Product {
    /// The text that gets embedded for this product, in the exact shape the
    /// index's query side expects: `"{name} {category} {description}"`.
    pub fn embed_text(&self) -> String {
        format!("{} {} {}", self.name, self.category, self.description)
    }
}

fn names_for(category: &str) -> &'static [&'static str; 10] {
    &PRODUCTS_BY_CATEGORY
        .iter()
        .find(|(c, _)| *c == category)
        .expect("known category")
        .1
}

fn brands_for(category: &str) -> &'static [&'static str; 5] {
    &BRANDS_BY_CATEGORY
        .iter()
        .find(|(c, _)| *c == category)
        .expect("known category")
        .1
}

/// Generate `count` random products with ids `PROD-{CAT}-{00001..}`.
pub fn generate_products(count: usize) -> Vec<Product> {
    let mut products = Vec::with_capacity(count);

    for i in 1..=count {
        let category = CATEGORIES[fastrand::usize(..CATEGORIES.len())];
        let names = names_for(category);
        let brands = brands_for(category);
        let product_name = names[fastrand::usize(..names.len())];
        let brand = brands[fastrand::usize(..brands.len())];

        let id = format!("PROD-{}-{:05}", &category[..3], i);
        let name = format!("{brand} {product_name}");
        let description =
            format!("{brand}에서 만든 고품질 {product_name}입니다. {category} 카테고리의 인기 상품.");

        products.push(Product {
            id,
            name,
            category: category.to_string(),
            brand: brand.to_string(),
            price: fastrand::u32(10_000..=500_000),
            stock: fastrand::u32(0..=1_000),
            description,
        });
    }

    products
}
