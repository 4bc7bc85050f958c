use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A menu item.
///
/// `calories` and `proteins` are optional in stored documents; an absent
/// or `null` value is read as 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub id: u64,
    pub category: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calories: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proteins: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popular: bool,
}

impl Dish {
    pub fn new(id: u64, category: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            category: category.into(),
            name: name.into(),
            ingredients: String::new(),
            calories: 0.0,
            proteins: 0.0,
            price,
            image: None,
            popular: false,
        }
    }

    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients = ingredients.into();
        self
    }

    pub fn with_nutrition(mut self, calories: f64, proteins: f64) -> Self {
        self.calories = calories;
        self.proteins = proteins;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_popular(mut self, popular: bool) -> Self {
        self.popular = popular;
        self
    }
}

impl fmt::Display for Dish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("#{} {}", self.id, self.name);
        writeln!(f, "{}", title)?;
        writeln!(f, "{}", "=".repeat(title.chars().count()))?;
        writeln!(f, "Category: {}", self.category)?;
        writeln!(f, "Price: {}", format_amount(self.price))?;

        if self.popular {
            writeln!(f, "Popular: yes")?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients: {}", self.ingredients)?;
        }

        if self.calories > 0.0 || self.proteins > 0.0 {
            writeln!(f, "\nNutrition:")?;
            if self.calories > 0.0 {
                writeln!(f, "  - calories: {} kcal", format_amount(self.calories))?;
            }
            if self.proteins > 0.0 {
                writeln!(f, "  - proteins: {} g", format_amount(self.proteins))?;
            }
        }

        if let Some(image) = &self.image {
            writeln!(f, "\nImage: {}", image)?;
        }

        Ok(())
    }
}

/// A menu section. The name doubles as the identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Formats a price or nutrition amount without a trailing `.0` for whole values.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_new() {
        let dish = Dish::new(1, "Plats", "Poulet", 2500.0);
        assert_eq!(dish.id, 1);
        assert_eq!(dish.category, "Plats");
        assert!(dish.ingredients.is_empty());
        assert_eq!(dish.calories, 0.0);
        assert!(!dish.popular);
    }

    #[test]
    fn test_dish_optional_fields_default_when_absent() {
        let json = r#"{"id":3,"category":"Boissons","name":"Bissap","price":500}"#;
        let dish: Dish = serde_json::from_str(json).unwrap();
        assert_eq!(dish.calories, 0.0);
        assert_eq!(dish.proteins, 0.0);
        assert_eq!(dish.image, None);
        assert!(!dish.popular);
    }

    #[test]
    fn test_dish_null_fields_read_as_default() {
        let json = r#"{"id":4,"category":"Plats","name":"Mafé","price":2000,
            "ingredients":null,"calories":null,"proteins":null,"image":null,"popular":null}"#;
        let dish: Dish = serde_json::from_str(json).unwrap();
        assert!(dish.ingredients.is_empty());
        assert_eq!(dish.calories, 0.0);
        assert_eq!(dish.proteins, 0.0);
        assert_eq!(dish.image, None);
        assert!(!dish.popular);
    }

    #[test]
    fn test_dish_serialization_omits_missing_image() {
        let dish = Dish::new(1, "Plats", "Poulet", 2500.0);
        let json = serde_json::to_string(&dish).unwrap();
        assert!(!json.contains("image"));

        let dish = dish.with_image("https://example.com/poulet.jpg");
        let json = serde_json::to_string(&dish).unwrap();
        assert!(json.contains("poulet.jpg"));
    }

    #[test]
    fn test_dish_display() {
        let dish = Dish::new(7, "Plats", "Thieboudienne", 3000.0)
            .with_ingredients("riz, poisson, légumes")
            .with_nutrition(650.0, 32.5)
            .with_popular(true);

        let output = format!("{}", dish);
        assert!(output.contains("#7 Thieboudienne"));
        assert!(output.contains("Price: 3000"));
        assert!(output.contains("Popular: yes"));
        assert!(output.contains("proteins: 32.50 g"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2500.0), "2500");
        assert_eq!(format_amount(12.5), "12.50");
        assert_eq!(format_amount(0.0), "0");
    }
}
