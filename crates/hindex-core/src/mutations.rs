// Everything that changes the state, plus the read-only views the front-ends use
use crate::hindex::{compute_h_index, HIndex};
use crate::models::{parse_citations_input, Article, Collection};
use crate::prompt::{self, Prompter};
use crate::store::{Focus, StateStore};
use crate::Result;
use tracing::debug;

/// What a mutation ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed and was persisted
    Applied,
    /// Nothing to do (unknown name, index out of range, already active...)
    Unchanged,
    /// The user said no to the confirmation
    Declined,
    /// Refused with a notice, e.g. a duplicate collection name
    Rejected,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

impl StateStore {
    /// Append an article to the active collection
    pub fn add_article(&mut self, title: Option<&str>, citations: Option<u64>) -> Result<Outcome> {
        let article = Article::new(title.unwrap_or_default(), citations.unwrap_or(0));
        debug!("Adding article {:?}", article.title);
        self.state_mut().active_mut().articles.push(article);
        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Append an article and put the cursor on its title after the render
    pub fn add_article_and_focus(&mut self) -> Result<Outcome> {
        self.request_focus(Some(Focus::LastTitle));
        self.add_article(None, None)
    }

    /// Append a placeholder article with the given citation count
    pub fn add_sample(&mut self, citations: u64) -> Result<Outcome> {
        self.add_article(Some("New Article"), Some(citations))
    }

    pub fn remove_article(&mut self, index: usize) -> Result<Outcome> {
        let articles = &mut self.state_mut().active_mut().articles;
        if index >= articles.len() {
            return Ok(Outcome::Unchanged);
        }
        let removed = articles.remove(index);
        debug!("Removed article {} ({:?})", index, removed.title);
        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Empty the active collection, if the user agrees
    pub fn clear_active_collection(&mut self, prompter: &dyn Prompter) -> Result<Outcome> {
        if !prompter.confirm(prompt::CLEAR_PROMPT) {
            return Ok(Outcome::Declined);
        }
        self.state_mut().active_mut().articles.clear();
        self.persist()?;
        Ok(Outcome::Applied)
    }

    pub fn edit_article_title(&mut self, index: usize, title: &str) -> Result<Outcome> {
        let Some(article) = self.state_mut().active_mut().articles.get_mut(index) else {
            return Ok(Outcome::Unchanged);
        };
        article.title = title.to_string();
        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Set citations from raw field input; junk and negatives become 0
    pub fn edit_article_citations(&mut self, index: usize, raw: &str) -> Result<Outcome> {
        let Some(article) = self.state_mut().active_mut().articles.get_mut(index) else {
            return Ok(Outcome::Unchanged);
        };
        article.citations = parse_citations_input(raw);
        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Create a collection and switch to it
    ///
    /// A blank name picks the first free "Collection N" starting at 2.
    pub fn add_collection(&mut self, name: Option<&str>, prompter: &dyn Prompter) -> Result<Outcome> {
        let trimmed = name.unwrap_or_default().trim();
        let name = if trimmed.is_empty() {
            self.next_collection_name()
        } else {
            trimmed.to_string()
        };

        if self.state().contains(&name) {
            prompter.alert(prompt::DUPLICATE_ON_CREATE);
            return Ok(Outcome::Rejected);
        }

        debug!("Creating collection {:?}", name);
        let state = self.state_mut();
        state.push_collection(&name);
        state.set_current(&name);
        self.request_focus(None);
        self.persist()?;
        Ok(Outcome::Applied)
    }

    fn next_collection_name(&self) -> String {
        (2..)
            .map(|i| format!("Collection {}", i))
            .find(|candidate| !self.state().contains(candidate))
            .unwrap_or_default()
    }

    /// Delete a collection after confirmation
    ///
    /// Deleting the last one brings back an empty default collection.
    pub fn delete_collection(&mut self, name: &str, prompter: &dyn Prompter) -> Result<Outcome> {
        if !self.state().contains(name) {
            return Ok(Outcome::Unchanged);
        }
        if !prompter.confirm(&prompt::delete_prompt(name)) {
            return Ok(Outcome::Declined);
        }

        debug!("Deleting collection {:?}", name);
        self.state_mut().remove_collection(name);
        self.request_focus(Some(Focus::FirstTitle));
        self.persist()?;
        Ok(Outcome::Applied)
    }

    pub fn switch_collection(&mut self, name: &str) -> Result<Outcome> {
        if name == self.state().current() || !self.state_mut().set_current(name) {
            return Ok(Outcome::Unchanged);
        }
        debug!("Switched to collection {:?}", name);
        self.request_focus(Some(Focus::FirstTitle));
        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Rename a collection, following it with `current` if it was active
    pub fn rename_collection(
        &mut self,
        old: &str,
        new: &str,
        prompter: &dyn Prompter,
    ) -> Result<Outcome> {
        if !self.state().contains(old) {
            return Ok(Outcome::Unchanged);
        }
        let new = new.trim();
        if new.is_empty() || new == old {
            return Ok(Outcome::Unchanged);
        }
        if self.state().contains(new) {
            prompter.alert(prompt::DUPLICATE_ON_RENAME);
            return Ok(Outcome::Rejected);
        }

        debug!("Renaming collection {:?} -> {:?}", old, new);
        self.state_mut().rename_collection(old, new);
        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Copy of the active collection's articles
    pub fn articles(&self) -> Vec<Article> {
        self.state().active().articles.clone()
    }

    /// Copy of every collection, in order
    pub fn collections(&self) -> Vec<Collection> {
        self.state().collections().to_vec()
    }

    pub fn current(&self) -> &str {
        self.state().current()
    }

    /// H-index of the active collection
    pub fn compute(&self) -> HIndex {
        compute_h_index(&self.state().active().citations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_COLLECTION;
    use crate::prompt::{Answered, MockPrompter};
    use crate::store::{RenderRequest, STORAGE_KEY};
    use hindex_cache::{MemorySlots, SlotStore};
    use mockall::predicate::eq;
    use proptest::prelude::*;

    fn store() -> StateStore {
        StateStore::open(Box::new(MemorySlots::new())).unwrap()
    }

    fn stored_json(store: &StateStore) -> serde_json::Value {
        let raw = store.slots().get(STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_add_and_remove_article() {
        let mut store = store();
        store.add_article(Some("Fresh"), Some(9)).unwrap();
        store.add_article(None, None).unwrap();

        let articles = store.articles();
        assert_eq!(articles.len(), 5);
        assert_eq!(articles[3], Article::new("Fresh", 9));
        assert_eq!(articles[4], Article::default());

        assert_eq!(store.remove_article(0).unwrap(), Outcome::Applied);
        assert_eq!(store.remove_article(99).unwrap(), Outcome::Unchanged);
        assert_eq!(store.articles()[0].title, "Graph Algorithms");

        // Every mutation lands in storage
        assert_eq!(
            stored_json(&store)["collections"][DEFAULT_COLLECTION]
                .as_array()
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn test_edit_fields() {
        let mut store = store();
        store.edit_article_title(1, "Renamed").unwrap();
        store.edit_article_citations(1, "12abc").unwrap();
        assert_eq!(store.articles()[1], Article::new("Renamed", 12));

        store.edit_article_citations(1, "-3").unwrap();
        assert_eq!(store.articles()[1].citations, 0);

        store.edit_article_citations(1, "").unwrap();
        assert_eq!(store.articles()[1].citations, 0);

        assert_eq!(store.edit_article_title(7, "x").unwrap(), Outcome::Unchanged);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut store = store();

        let mut decline = MockPrompter::new();
        decline
            .expect_confirm()
            .with(eq(prompt::CLEAR_PROMPT))
            .times(1)
            .return_const(false);
        assert_eq!(store.clear_active_collection(&decline).unwrap(), Outcome::Declined);
        assert_eq!(store.articles().len(), 3);

        let mut accept = MockPrompter::new();
        accept.expect_confirm().times(1).return_const(true);
        assert_eq!(store.clear_active_collection(&accept).unwrap(), Outcome::Applied);
        assert!(store.articles().is_empty());
    }

    #[test]
    fn test_auto_named_collections() {
        let mut store = store();
        let prompter = Answered::yes();

        store.add_collection(Some(""), &prompter).unwrap();
        assert_eq!(store.current(), "Collection 2");
        store.add_collection(None, &prompter).unwrap();
        assert_eq!(store.current(), "Collection 3");

        let names: Vec<String> = store.collections().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec![DEFAULT_COLLECTION, "Collection 2", "Collection 3"]);
        assert!(store.articles().is_empty());
    }

    #[test]
    fn test_auto_name_fills_gaps() {
        let mut store = store();
        let prompter = Answered::yes();
        store.add_collection(Some("Collection 3"), &prompter).unwrap();
        store.add_collection(Some("   "), &prompter).unwrap();
        assert_eq!(store.current(), "Collection 2");
    }

    #[test]
    fn test_duplicate_collection_is_rejected() {
        let mut store = store();
        let before = store.state().clone();

        let mut prompter = MockPrompter::new();
        prompter
            .expect_alert()
            .with(eq(prompt::DUPLICATE_ON_CREATE))
            .times(1)
            .return_const(());

        let outcome = store.add_collection(Some(" My Collection "), &prompter).unwrap();
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_delete_collection() {
        let mut store = store();
        let yes = Answered::yes();
        store.add_collection(Some("Second"), &yes).unwrap();

        assert_eq!(store.delete_collection("Nope", &yes).unwrap(), Outcome::Unchanged);

        let mut prompter = MockPrompter::new();
        prompter
            .expect_confirm()
            .with(eq("Delete collection \"Second\"?"))
            .times(1)
            .return_const(true);
        assert_eq!(store.delete_collection("Second", &prompter).unwrap(), Outcome::Applied);
        assert_eq!(store.current(), DEFAULT_COLLECTION);
        assert_eq!(store.articles().len(), 3);
    }

    #[test]
    fn test_delete_declined_changes_nothing() {
        let mut store = store();
        let before = store.state().clone();
        assert_eq!(
            store.delete_collection(DEFAULT_COLLECTION, &Answered::no()).unwrap(),
            Outcome::Declined
        );
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_delete_last_collection_reseeds_empty_default() {
        let mut store = store();
        let yes = Answered::yes();
        store.rename_collection(DEFAULT_COLLECTION, "Only", &yes).unwrap();
        store.delete_collection("Only", &yes).unwrap();

        let collections = store.collections();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, DEFAULT_COLLECTION);
        assert!(collections[0].articles.is_empty());
        assert_eq!(store.current(), DEFAULT_COLLECTION);
    }

    #[test]
    fn test_switch_collection() {
        let mut store = store();
        let yes = Answered::yes();
        store.add_collection(Some("Other"), &yes).unwrap();

        assert_eq!(store.switch_collection("Other").unwrap(), Outcome::Unchanged);
        assert_eq!(store.switch_collection("Ghost").unwrap(), Outcome::Unchanged);
        assert_eq!(store.switch_collection(DEFAULT_COLLECTION).unwrap(), Outcome::Applied);
        assert_eq!(store.current(), DEFAULT_COLLECTION);
        assert_eq!(stored_json(&store)["current"], DEFAULT_COLLECTION);
    }

    #[test]
    fn test_rename_collection() {
        let mut store = store();
        let yes = Answered::yes();
        store.add_collection(Some("B"), &yes).unwrap();
        store.switch_collection(DEFAULT_COLLECTION).unwrap();

        assert_eq!(store.rename_collection("Ghost", "X", &yes).unwrap(), Outcome::Unchanged);
        assert_eq!(store.rename_collection("B", "   ", &yes).unwrap(), Outcome::Unchanged);
        assert_eq!(store.rename_collection("B", " B ", &yes).unwrap(), Outcome::Unchanged);

        assert_eq!(store.rename_collection(DEFAULT_COLLECTION, " A ", &yes).unwrap(), Outcome::Applied);
        assert_eq!(store.current(), "A");
        assert_eq!(store.articles().len(), 3);
        assert!(!store.state().contains(DEFAULT_COLLECTION));
        assert_eq!(store.state().names(), vec!["B", "A"]);
    }

    #[test]
    fn test_rename_onto_existing_name_is_rejected() {
        let mut store = store();
        let yes = Answered::yes();
        store.add_collection(Some("B"), &yes).unwrap();
        store.switch_collection(DEFAULT_COLLECTION).unwrap();
        let before = store.state().clone();

        let mut prompter = MockPrompter::new();
        prompter
            .expect_alert()
            .with(eq(prompt::DUPLICATE_ON_RENAME))
            .times(1)
            .return_const(());

        assert_eq!(
            store.rename_collection(DEFAULT_COLLECTION, "B", &prompter).unwrap(),
            Outcome::Rejected
        );
        assert_eq!(store.state(), &before);
        assert_eq!(store.current(), DEFAULT_COLLECTION);
    }

    #[test]
    fn test_focus_requests() {
        let mut store = store();
        let yes = Answered::yes();
        store.mark_ui_ready();
        store.take_render_request();

        store.add_collection(Some("B"), &yes).unwrap();
        assert_eq!(store.take_render_request(), Some(RenderRequest { focus: None }));

        store.switch_collection(DEFAULT_COLLECTION).unwrap();
        assert_eq!(
            store.take_render_request(),
            Some(RenderRequest {
                focus: Some(Focus::FirstTitle)
            })
        );

        store.add_article_and_focus().unwrap();
        assert_eq!(
            store.take_render_request(),
            Some(RenderRequest {
                focus: Some(Focus::LastTitle)
            })
        );

        store.delete_collection("B", &yes).unwrap();
        assert_eq!(
            store.take_render_request(),
            Some(RenderRequest {
                focus: Some(Focus::FirstTitle)
            })
        );
    }

    #[test]
    fn test_read_views_are_copies() {
        let mut store = store();
        let mut copy = store.articles();
        copy.clear();
        assert_eq!(store.articles().len(), 3);

        let h = store.compute();
        assert_eq!(h.h, 3);
        assert_eq!(h.sorted, vec![123, 47, 5]);

        store.add_sample(4).unwrap();
        assert_eq!(store.articles()[3], Article::new("New Article", 4));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(String),
        Delete(usize),
        Rename(usize, String),
        Switch(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[ab ]{0,3}".prop_map(Op::Add),
            (0usize..6).prop_map(Op::Delete),
            ((0usize..6), "[ab ]{0,3}").prop_map(|(i, n)| Op::Rename(i, n)),
            (0usize..6).prop_map(Op::Switch),
        ]
    }

    proptest! {
        #[test]
        fn proptest_current_always_valid(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut store = store();
            let yes = Answered::yes();

            for op in ops {
                let names: Vec<String> = store.collections().into_iter().map(|c| c.name).collect();
                let pick = |i: usize| names[i % names.len()].clone();
                match op {
                    Op::Add(name) => { store.add_collection(Some(name.as_str()), &yes).unwrap(); }
                    Op::Delete(i) => { store.delete_collection(&pick(i), &yes).unwrap(); }
                    Op::Rename(i, new) => { store.rename_collection(&pick(i), &new, &yes).unwrap(); }
                    Op::Switch(i) => { store.switch_collection(&pick(i)).unwrap(); }
                }

                prop_assert!(!store.collections().is_empty());
                prop_assert!(store.state().contains(store.current()));
            }
        }
    }
}
