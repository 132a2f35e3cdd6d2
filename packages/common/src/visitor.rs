use lessonform_nodes::{LessonDocument, LessonNode, RichTextState};
use uuid::Uuid;

/// Visitor pattern for traversing a lesson document immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &LessonDocument) {
        walk_document(self, doc);
    }

    fn visit_node(&mut self, node: &LessonNode) {
        walk_node(self, node);
    }

    fn visit_fragment(&mut self, fragment: &RichTextState) {
        walk_fragment(self, fragment);
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &LessonDocument) {
    for node in doc.children() {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &LessonNode) {
    match node {
        LessonNode::TrueOrFalse { payload, .. } => {
            visitor.visit_fragment(&payload.question_state);
            visitor.visit_fragment(&payload.explanation_state);
        }
        LessonNode::TapToReveal { payload, .. } => {
            visitor.visit_fragment(&payload.front_side_state);
            visitor.visit_fragment(&payload.back_side_state);
        }
        LessonNode::MatchConcepts { payload, .. } => {
            visitor.visit_fragment(&payload.title);
            for pair in &payload.items {
                visitor.visit_fragment(&pair.item);
                visitor.visit_fragment(&pair.value);
            }
        }
        LessonNode::RichText { state, .. } => {
            visitor.visit_fragment(state);
        }
        // Leaf nodes, no fragments to walk
        LessonNode::File { .. } | LessonNode::Image { .. } | LessonNode::PageBreak { .. } => {}
    }
}

pub fn walk_fragment<V: Visitor>(visitor: &mut V, fragment: &RichTextState) {
    for child in &fragment.children {
        visitor.visit_fragment(child);
    }
}

/// Collect the stable identities attached to a document's top-level nodes
pub fn collect_uuids(doc: &LessonDocument) -> Vec<Uuid> {
    struct UuidCollector(Vec<Uuid>);

    impl Visitor for UuidCollector {
        fn visit_node(&mut self, node: &LessonNode) {
            if let Some(uuid) = node.uuid() {
                self.0.push(uuid);
            }
            walk_node(self, node);
        }
    }

    let mut collector = UuidCollector(Vec::new());
    collector.visit_document(doc);
    collector.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonform_nodes::TapToRevealPayload;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collect_uuids_in_document_order() {
        let card = LessonNode::tap_to_reveal(TapToRevealPayload {
            front_side_state: RichTextState::paragraph_root("front"),
            back_side_state: RichTextState::paragraph_root("back"),
        });
        let gate = LessonNode::page_break();

        let card_uuid = card.uuid().unwrap();
        let gate_uuid = gate.uuid().unwrap();

        let doc = LessonDocument::from_children(vec![
            LessonNode::rich_text(RichTextState::paragraph_root("prose")),
            card,
            gate,
        ]);

        assert_eq!(collect_uuids(&doc), vec![card_uuid, gate_uuid]);
    }

    #[test]
    fn test_fragment_walk_reaches_nested_children() {
        struct Counter(usize);
        impl Visitor for Counter {
            fn visit_fragment(&mut self, fragment: &RichTextState) {
                self.0 += 1;
                walk_fragment(self, fragment);
            }
        }

        let doc = LessonDocument::from_children(vec![LessonNode::rich_text(
            RichTextState::paragraph_root("text"),
        )]);

        let mut counter = Counter(0);
        counter.visit_document(&doc);
        // root + paragraph + text leaf
        assert_eq!(counter.0, 3);
    }
}
