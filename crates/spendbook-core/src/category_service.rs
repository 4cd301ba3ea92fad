use spendbook_domain::{slugify, Book, Category, DEFAULT_CATEGORY_ID, FALLBACK_CATEGORY_ICON};
use tracing::info;

use crate::{CoreError, CoreResult};

pub struct CategoryService;

impl CategoryService {
    /// Creates a category from its display name, returning the derived slug.
    pub fn add(book: &mut Book, name: &str, icon: Option<&str>) -> CoreResult<String> {
        let name = Self::validate_name(name)?;
        let slug = slugify(name);
        if slug.is_empty() || slug.chars().all(|ch| ch == '-') {
            return Err(CoreError::Validation(format!(
                "Category name `{name}` must contain letters or digits"
            )));
        }
        if book.has_category(&slug) {
            return Err(CoreError::DuplicateCategory(name.to_string()));
        }
        let icon = Self::icon_or_fallback(icon);
        book.insert_category(slug.clone(), Category::new(name, icon));
        info!(slug = %slug, "category added");
        Ok(slug)
    }

    /// Renames and re-icons a category. The slug never changes.
    pub fn edit(book: &mut Book, slug: &str, name: &str, icon: Option<&str>) -> CoreResult<()> {
        let name = Self::validate_name(name)?;
        let category = book
            .category_mut(slug)
            .ok_or_else(|| CoreError::CategoryNotFound(slug.to_string()))?;
        category.name = name.to_string();
        if let Some(icon) = icon.map(str::trim).filter(|icon| !icon.is_empty()) {
            category.icon = icon.to_string();
        }
        info!(slug, "category updated");
        Ok(())
    }

    /// Deletes a category and every transaction it owns.
    pub fn remove(book: &mut Book, slug: &str) -> CoreResult<Category> {
        if slug == DEFAULT_CATEGORY_ID {
            return Err(CoreError::ProtectedCategory(slug.to_string()));
        }
        let was_active = book.active_slug() == slug;
        let removed = book
            .remove_category(slug)
            .ok_or_else(|| CoreError::CategoryNotFound(slug.to_string()))?;
        if was_active {
            book.set_active(DEFAULT_CATEGORY_ID);
        }
        info!(
            slug,
            discarded = removed.transactions.len(),
            "category deleted"
        );
        Ok(removed)
    }

    pub fn switch(book: &mut Book, slug: &str) -> CoreResult<()> {
        if !book.set_active(slug) {
            return Err(CoreError::CategoryNotFound(slug.to_string()));
        }
        info!(slug, "active category switched");
        Ok(())
    }

    /// Activates the next category in display order, wrapping around.
    pub fn next(book: &mut Book) -> String {
        Self::cycle(book, 1)
    }

    /// Activates the previous category in display order, wrapping around.
    pub fn previous(book: &mut Book) -> String {
        Self::cycle(book, -1)
    }

    pub fn list(book: &Book) -> Vec<(&str, &Category)> {
        book.slugs()
            .into_iter()
            .filter_map(|slug| book.category(slug).map(|category| (slug, category)))
            .collect()
    }

    fn cycle(book: &mut Book, step: isize) -> String {
        let slugs: Vec<String> = book.slugs().into_iter().map(str::to_string).collect();
        let len = slugs.len() as isize;
        let current = slugs
            .iter()
            .position(|slug| slug == book.active_slug())
            .unwrap_or(0) as isize;
        let target = slugs[(current + step).rem_euclid(len) as usize].clone();
        book.set_active(&target);
        target
    }

    fn validate_name(name: &str) -> CoreResult<&str> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            Err(CoreError::Validation("Category name is required".into()))
        } else {
            Ok(trimmed)
        }
    }

    fn icon_or_fallback(icon: Option<&str>) -> String {
        icon.map(str::trim)
            .filter(|icon| !icon.is_empty())
            .unwrap_or(FALLBACK_CATEGORY_ICON)
            .to_string()
    }
}
