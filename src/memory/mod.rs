//! Paged memory: a sparse mapping from page index to a fixed-size page with
//! an access permission, shared by program loading, `load_*`/`store_*`, and
//! `sbrk`.
//!
//! There is exactly one memory abstraction in this crate — program loading,
//! instruction fetch, and the `sbrk` heap all go through [`PagedMemory`].

mod page;

pub use page::{AccessMode, Page};

use crate::consts::PAGE_SIZE;
use std::collections::BTreeMap;
use thiserror::Error;

/// A page-granular permission violation or unmapped access.
///
/// Carries the first offending page index encountered while walking the
/// requested byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page fault at page {page}")]
pub struct PageFault {
    /// The page index that was unmapped or lacked the required permission.
    pub page: u64,
}

/// A sparse, page-granular address space.
///
/// Unmapped page indices behave as [`AccessMode::Inaccessible`]. The
/// invariant maintained by callers (program loader, `sbrk`) is that the set
/// of mapped pages is always the union of the loaded program's read-only
/// pages and the dynamically-allocated read-write pages.
#[derive(Debug, Clone, Default)]
pub struct PagedMemory {
    pages: BTreeMap<u64, Page>,
}

impl PagedMemory {
    /// An empty address space with no mapped pages.
    pub fn new() -> Self {
        Self { pages: BTreeMap::new() }
    }

    /// Create or replace the page at `page_index` with a zero-filled buffer
    /// and the given access mode. Never fails.
    pub fn allocate(&mut self, page_index: u64, mode: AccessMode) {
        tracing::trace!(page_index, %mode, "allocating page");
        self.pages.insert(page_index, Page::zeroed(mode));
    }

    /// The page at `page_index`, if mapped.
    pub fn page(&self, page_index: u64) -> Option<&Page> {
        self.pages.get(&page_index)
    }

    /// The number of currently mapped pages.
    pub fn mapped_page_count(&self) -> u64 {
        self.pages.len() as u64
    }

    /// The highest mapped page index plus one, or `0` if no pages are
    /// mapped. Used by `sbrk` to place freshly allocated pages directly
    /// after every existing page.
    pub fn next_page_index(&self) -> u64 {
        self.pages.keys().next_back().map_or(0, |&idx| idx + 1)
    }

    /// Load a program image into memory starting at page 0, as consecutive
    /// read-only pages. The final page is zero-padded if the image does not
    /// fill it exactly.
    pub fn load_program(&mut self, program: &[u8]) {
        if program.is_empty() {
            return;
        }
        let page_size = PAGE_SIZE as usize;
        for (index, chunk) in program.chunks(page_size).enumerate() {
            let mut page = Page::zeroed(AccessMode::ReadOnly);
            page.bytes_mut()[..chunk.len()].copy_from_slice(chunk);
            self.pages.insert(index as u64, page);
        }
    }

    /// Bump-allocate `count` fresh read-write pages starting immediately
    /// after the highest currently mapped page, returning the base address
    /// of the first new page.
    pub fn grow(&mut self, count: u64) -> u64 {
        let base_page = self.next_page_index();
        for offset in 0..count {
            self.allocate(base_page + offset, AccessMode::ReadWrite);
        }
        base_page * PAGE_SIZE
    }

    /// Read `length` bytes starting at `address`, failing with the first
    /// page lacking read permission.
    pub fn read(&self, address: u64, length: u64) -> Result<Vec<u8>, PageFault> {
        let mut out = Vec::with_capacity(length as usize);
        for offset in 0..length {
            let addr = address.wrapping_add(offset);
            out.push(self.read_byte(addr)?);
        }
        Ok(out)
    }

    /// Write `bytes` starting at `address`.
    ///
    /// Every touched page's write permission is checked before any byte is
    /// mutated, so a failing write never leaves a partial, host-visible
    /// change behind.
    pub fn write(&mut self, address: u64, bytes: &[u8]) -> Result<(), PageFault> {
        for (offset, _) in bytes.iter().enumerate() {
            let addr = address.wrapping_add(offset as u64);
            self.check_writable(addr)?;
        }
        for (offset, byte) in bytes.iter().enumerate() {
            let addr = address.wrapping_add(offset as u64);
            self.write_byte_unchecked(addr, *byte);
        }
        Ok(())
    }

    fn read_byte(&self, address: u64) -> Result<u8, PageFault> {
        let page_index = address / PAGE_SIZE;
        let offset = (address % PAGE_SIZE) as usize;
        let page = self.pages.get(&page_index).ok_or(PageFault { page: page_index })?;
        if !page.mode().is_readable() {
            return Err(PageFault { page: page_index });
        }
        Ok(page.bytes()[offset])
    }

    fn check_writable(&self, address: u64) -> Result<(), PageFault> {
        let page_index = address / PAGE_SIZE;
        let page = self.pages.get(&page_index).ok_or(PageFault { page: page_index })?;
        if !page.mode().is_writable() {
            return Err(PageFault { page: page_index });
        }
        Ok(())
    }

    fn write_byte_unchecked(&mut self, address: u64, byte: u8) {
        let page_index = address / PAGE_SIZE;
        let offset = (address % PAGE_SIZE) as usize;
        // `check_writable` already verified every touched page exists and is
        // writable, so this lookup cannot miss.
        let page = self.pages.get_mut(&page_index).expect("page checked writable above");
        page.bytes_mut()[offset] = byte;
    }
}
