use crate::model::{Intent, Item, MoveDescriptor, Outline};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_item<'a>(outline: &'a Outline, id: &str) -> Option<&'a Item> {
    find_in(&outline.items, id)
}

pub fn find_item_mut<'a>(outline: &'a mut Outline, id: &str) -> Option<&'a mut Item> {
    find_in_mut(&mut outline.items, id)
}

fn find_in<'a>(items: &'a [Item], id: &str) -> Option<&'a Item> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_in(&item.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(items: &'a mut [Item], id: &str) -> Option<&'a mut Item> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_in_mut(&mut item.children, id) {
            return Some(found);
        }
    }
    None
}

/// True if `id` names `item` or any of its descendants.
pub fn subtree_contains(item: &Item, id: &str) -> bool {
    item.id == id || item.children.iter().any(|c| subtree_contains(c, id))
}

/// The item's current placement: parent id (None = top level) and index
/// within that parent's children.
pub fn position_of(outline: &Outline, id: &str) -> Option<(Option<String>, usize)> {
    if let Some(index) = outline.items.iter().position(|i| i.id == id) {
        return Some((None, index));
    }
    position_in(&outline.items, id)
}

fn position_in(items: &[Item], id: &str) -> Option<(Option<String>, usize)> {
    for item in items {
        if let Some(index) = item.children.iter().position(|c| c.id == id) {
            return Some((Some(item.id.clone()), index));
        }
        if let Some(found) = position_in(&item.children, id) {
            return Some(found);
        }
    }
    None
}

/// Number of children under `parent` (top level when None). None when the
/// parent itself is missing.
pub fn child_count(outline: &Outline, parent: Option<&str>) -> Option<usize> {
    match parent {
        None => Some(outline.items.len()),
        Some(id) => find_item(outline, id).map(|i| i.children.len()),
    }
}

// ---------------------------------------------------------------------------
// Structure edits
// ---------------------------------------------------------------------------

/// Remove the item (with its subtree) from wherever it sits.
pub fn detach_item(outline: &mut Outline, id: &str) -> Option<Item> {
    detach_in(&mut outline.items, id)
}

fn detach_in(items: &mut Vec<Item>, id: &str) -> Option<Item> {
    if let Some(index) = items.iter().position(|i| i.id == id) {
        return Some(items.remove(index));
    }
    for item in items {
        if let Some(detached) = detach_in(&mut item.children, id) {
            return Some(detached);
        }
    }
    None
}

/// Insert under `parent` at `index` (clamped to the sibling count).
/// Returns the item back when the parent does not exist.
pub fn insert_item(
    outline: &mut Outline,
    item: Item,
    parent: Option<&str>,
    index: usize,
) -> Result<(), Item> {
    let siblings = match parent {
        None => &mut outline.items,
        Some(parent_id) => match find_item_mut(outline, parent_id) {
            Some(parent_item) => &mut parent_item.children,
            None => return Err(item),
        },
    };
    let index = index.min(siblings.len());
    siblings.insert(index, item);
    Ok(())
}

/// Reposition an item per the descriptor. Refused (false) when the item or
/// destination parent is missing, or when the destination sits inside the
/// moving subtree.
pub fn apply_move(outline: &mut Outline, mv: &MoveDescriptor) -> bool {
    if let Some(parent_id) = mv.parent.as_deref() {
        match find_item(outline, &mv.id) {
            Some(moving) if subtree_contains(moving, parent_id) => return false,
            Some(_) => {}
            None => return false,
        }
        if find_item(outline, parent_id).is_none() {
            return false;
        }
    }
    let Some(item) = detach_item(outline, &mv.id) else {
        return false;
    };
    // Parent existence was checked before detaching, so this cannot fail.
    insert_item(outline, item, mv.parent.as_deref(), mv.index).is_ok()
}

/// Swap a client-chosen temporary id for the server-assigned one.
pub fn adopt_id(outline: &mut Outline, old: &str, new: &str) -> bool {
    match find_item_mut(outline, old) {
        Some(item) => {
            item.id = new.to_string();
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Intent application
// ---------------------------------------------------------------------------

/// Apply one intent to the client projection. Used both for the optimistic
/// apply and for replaying acknowledged ops onto confirmed state.
///
/// Returns false when the target no longer exists; callers drop that case
/// silently (the server echo is authoritative).
pub fn apply_intent(outline: &mut Outline, intent: &Intent) -> bool {
    match intent {
        Intent::Toggle { id, to, .. } => match find_item_mut(outline, id) {
            Some(item) => {
                item.status = to.clone();
                true
            }
            None => false,
        },
        Intent::Move(mv) => apply_move(outline, mv),
        Intent::Create {
            id,
            parent,
            index,
            title,
            status,
        } => {
            let item = Item::new(id.clone(), title.clone(), status.clone());
            insert_item(outline, item, parent.as_deref(), *index).is_ok()
        }
        Intent::Rename { id, title } => {
            // The outline itself is addressable for rename.
            if *id == outline.id {
                outline.title = title.clone();
                return true;
            }
            match find_item_mut(outline, id) {
                Some(item) => {
                    item.title = title.clone();
                    true
                }
                None => false,
            }
        }
        Intent::SetTags { id, tags } => match find_item_mut(outline, id) {
            Some(item) => {
                item.tags = tags.clone();
                true
            }
            None => false,
        },
        Intent::Assign { id, actor } => match find_item_mut(outline, id) {
            Some(item) => {
                item.assignee = actor.clone();
                true
            }
            None => false,
        },
        Intent::Flag { id, flag, on } => match find_item_mut(outline, id) {
            Some(item) => {
                item.set_flag(*flag, *on);
                true
            }
            None => false,
        },
        Intent::Schedule { id, field, at } => match find_item_mut(outline, id) {
            Some(item) => {
                item.set_date(*field, *at);
                true
            }
            None => false,
        },
        // Archive removes the subtree from view; refile moves it to another
        // resource, which reads the same way from this outline.
        Intent::Archive { id } | Intent::Refile { id, .. } => detach_item(outline, id).is_some(),
        // Vocabulary edits do not touch the tree.
        Intent::SetStatuses { .. } => true,
    }
}
