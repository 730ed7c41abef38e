//! Group bookkeeping: which frames exist, which group each belongs to, and
//! the document state every member of a group shares.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use log::debug;

use super::view::{FrameId, FrameView, GroupId};
use crate::app::infrastructure::error::{AppError, Result};

pub const APP_NAME: &str = "MirrorPad";
pub const UNTITLED: &str = "Untitled";
pub const DIRTY_MARKER: char = '*';

/// Window title for a group: the backing path (or "Untitled"), followed by
/// the dirty marker while there are unsaved changes.
pub fn window_title(file_path: Option<&Path>, dirty: bool) -> String {
    let name = match file_path {
        Some(path) => path.display().to_string(),
        None => UNTITLED.to_string(),
    };
    if dirty {
        format!("{} - {}{}", APP_NAME, name, DIRTY_MARKER)
    } else {
        format!("{} - {}", APP_NAME, name)
    }
}

pub struct Group {
    pub id: GroupId,
    frames: Vec<FrameId>,
    file_path: Option<PathBuf>,
    dirty: bool,
}

impl Group {
    fn new(id: GroupId) -> Self {
        Self {
            id,
            frames: Vec::new(),
            file_path: None,
            dirty: false,
        }
    }

    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn title(&self) -> String {
        window_title(self.file_path(), self.dirty)
    }
}

struct FrameEntry<V> {
    group: GroupId,
    view: V,
    /// Set while a file is being loaded into this frame.
    loading: bool,
}

/// A frame taken out of the registry. The caller owns the view from here on
/// and is expected to close it.
pub struct RemovedFrame<V> {
    pub view: V,
    pub group: GroupId,
    pub group_removed: bool,
}

pub struct Registry<V> {
    groups: BTreeMap<GroupId, Group>,
    frames: HashMap<FrameId, FrameEntry<V>>,
    next_group_id: u64,
    next_frame_id: u64,
}

impl<V: FrameView> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: FrameView> Registry<V> {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
            frames: HashMap::new(),
            next_group_id: 1,
            next_frame_id: 1,
        }
    }

    /// Next group id. Ids only ever increase, so one is never handed out
    /// twice while its group is registered.
    pub fn allocate_group_id(&mut self) -> GroupId {
        let id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        id
    }

    pub fn allocate_frame_id(&mut self) -> FrameId {
        let id = FrameId(self.next_frame_id);
        self.next_frame_id += 1;
        id
    }

    /// Register a new, still empty group. The caller adds its first frame
    /// right away.
    pub fn create_group(&mut self) -> GroupId {
        let id = self.allocate_group_id();
        self.groups.insert(id, Group::new(id));
        debug!("Created {}", id);
        id
    }

    pub fn add_frame(&mut self, id: FrameId, group: GroupId, mut view: V) -> Result<()> {
        let g = self.groups.get_mut(&group).ok_or(AppError::UnknownGroup(group))?;
        view.set_title(&g.title());
        g.frames.push(id);
        self.frames.insert(
            id,
            FrameEntry {
                group,
                view,
                loading: false,
            },
        );
        debug!("Added {} to {} ({} members)", id, group, g.frames.len());
        Ok(())
    }

    /// Register `view` as a new member of `source`'s group, carrying over the
    /// source's text, caret and selection. Dirty state and backing file are
    /// group-wide, so the title comes along with them.
    pub fn duplicate(&mut self, source: FrameId, id: FrameId, mut view: V) -> Result<GroupId> {
        let entry = self.frames.get(&source).ok_or(AppError::UnknownFrame(source))?;
        let group = entry.group;
        view.set_text(&entry.view.text());
        view.set_caret(entry.view.caret());
        view.set_selection(entry.view.selection());
        self.add_frame(id, group, view)?;
        Ok(group)
    }

    /// Push the source frame's text and caret to the rest of its group.
    ///
    /// The first edit of a clean group marks it dirty, unless the edit comes
    /// from a file being loaded.
    pub fn broadcast_text(&mut self, source: FrameId) -> Result<()> {
        let entry = self.frames.get(&source).ok_or(AppError::UnknownFrame(source))?;
        let group_id = entry.group;
        let loading = entry.loading;
        let text = entry.view.text();
        let caret = entry.view.caret();

        let group = self
            .groups
            .get_mut(&group_id)
            .ok_or(AppError::UnknownGroup(group_id))?;
        let newly_dirty = !group.dirty && !loading;
        if newly_dirty {
            group.dirty = true;
            debug!("{} has unsaved changes", group_id);
        }
        let title = (newly_dirty || loading).then(|| group.title());

        for id in &group.frames {
            let Some(member) = self.frames.get_mut(id) else {
                continue;
            };
            if *id != source {
                member.view.set_text(&text);
                member.view.set_caret(caret);
            }
            if let Some(ref title) = title {
                member.view.set_title(title);
            }
        }
        Ok(())
    }

    /// Push the source frame's selection (or lack of one) to its siblings.
    pub fn broadcast_selection(&mut self, source: FrameId) -> Result<()> {
        let entry = self.frames.get(&source).ok_or(AppError::UnknownFrame(source))?;
        let group_id = entry.group;
        let span = entry.view.selection();

        let group = self
            .groups
            .get(&group_id)
            .ok_or(AppError::UnknownGroup(group_id))?;
        for id in group.frames.iter().filter(|id| **id != source) {
            if let Some(member) = self.frames.get_mut(id) {
                member.view.set_selection(span);
            }
        }
        Ok(())
    }

    /// Record a successful save: optionally rebind the group to a new file,
    /// clear the dirty flag and retitle every member.
    pub fn mark_saved(&mut self, group: GroupId, path: Option<PathBuf>) -> Result<()> {
        let g = self.groups.get_mut(&group).ok_or(AppError::UnknownGroup(group))?;
        if let Some(path) = path {
            g.file_path = Some(path);
        }
        g.dirty = false;
        self.refresh_titles(group)
    }

    pub fn set_loading(&mut self, frame: FrameId, loading: bool) -> Result<()> {
        let entry = self.frames.get_mut(&frame).ok_or(AppError::UnknownFrame(frame))?;
        entry.loading = loading;
        Ok(())
    }

    pub fn is_loading(&self, frame: FrameId) -> bool {
        self.frames.get(&frame).is_some_and(|e| e.loading)
    }

    fn refresh_titles(&mut self, group: GroupId) -> Result<()> {
        let g = self.groups.get(&group).ok_or(AppError::UnknownGroup(group))?;
        let title = g.title();
        for id in &g.frames {
            if let Some(member) = self.frames.get_mut(id) {
                member.view.set_title(&title);
            }
        }
        Ok(())
    }

    /// Take a frame out of its group, dropping the group once it is empty.
    pub fn remove_frame(&mut self, frame: FrameId) -> Result<RemovedFrame<V>> {
        let entry = self.frames.remove(&frame).ok_or(AppError::UnknownFrame(frame))?;
        let group = entry.group;
        let mut group_removed = false;
        if let Some(g) = self.groups.get_mut(&group) {
            g.frames.retain(|id| *id != frame);
            if g.frames.is_empty() {
                self.groups.remove(&group);
                group_removed = true;
            }
        }
        debug!("Removed {} from {} (group removed: {})", frame, group, group_removed);
        Ok(RemovedFrame {
            view: entry.view,
            group,
            group_removed,
        })
    }

    /// Drop a whole group, returning its views in group order.
    pub fn remove_group(&mut self, group: GroupId) -> Result<Vec<V>> {
        let g = self.groups.remove(&group).ok_or(AppError::UnknownGroup(group))?;
        let views = g
            .frames
            .iter()
            .filter_map(|id| self.frames.remove(id))
            .map(|entry| entry.view)
            .collect::<Vec<_>>();
        debug!("Removed {} with {} frames", group, views.len());
        Ok(views)
    }

    /// Drop every group, returning all views.
    pub fn clear(&mut self) -> Vec<V> {
        let ids: Vec<GroupId> = self.groups.keys().copied().collect();
        let mut views = Vec::with_capacity(self.frames.len());
        for id in ids {
            if let Ok(mut group_views) = self.remove_group(id) {
                views.append(&mut group_views);
            }
        }
        views
    }

    pub fn group_of(&self, frame: FrameId) -> Result<GroupId> {
        self.frames
            .get(&frame)
            .map(|e| e.group)
            .ok_or(AppError::UnknownFrame(frame))
    }

    pub fn group(&self, group: GroupId) -> Option<&Group> {
        self.groups.get(&group)
    }

    pub fn frames_in(&self, group: GroupId) -> Result<&[FrameId]> {
        self.groups
            .get(&group)
            .map(|g| g.frames())
            .ok_or(AppError::UnknownGroup(group))
    }

    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups.keys().copied().collect()
    }

    pub fn contains_group(&self, group: GroupId) -> bool {
        self.groups.contains_key(&group)
    }

    pub fn contains_frame(&self, frame: FrameId) -> bool {
        self.frames.contains_key(&frame)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_dirty(&self, group: GroupId) -> bool {
        self.groups.get(&group).is_some_and(|g| g.dirty)
    }

    pub fn file_path(&self, group: GroupId) -> Option<&Path> {
        self.groups.get(&group).and_then(|g| g.file_path())
    }

    pub fn title(&self, group: GroupId) -> Option<String> {
        self.groups.get(&group).map(|g| g.title())
    }

    pub fn view(&self, frame: FrameId) -> Option<&V> {
        self.frames.get(&frame).map(|e| &e.view)
    }

    pub fn view_mut(&mut self, frame: FrameId) -> Option<&mut V> {
        self.frames.get_mut(&frame).map(|e| &mut e.view)
    }
}
