//! Scriptable in-memory target for tests and non-Windows development
//!
//! Simulates a target process as a sparse byte image with a module map, a
//! recording window, and failure injection (dead process, denied or
//! partially-copied reads).

use super::{PointerWidth, Target, TargetWindow};
use crate::core::types::{
    Address, KnownVersion, MemoryIoError, ResolveError, SyncResult, ERROR_PARTIAL_COPY,
};
use crate::input::geometry::{ClientRect, Point};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for a live target process.
pub struct FakeTarget {
    memory: Mutex<BTreeMap<u64, u8>>,
    main_module: Address,
    modules: Mutex<HashMap<String, Address>>,
    width: PointerWidth,
    version: Mutex<Option<KnownVersion>>,
    alive: AtomicBool,
    deny_io: AtomicBool,
    unreadable: Mutex<Vec<(u64, u64)>>,
    window: Mutex<Option<Arc<FakeWindow>>>,
    executable: Option<std::path::PathBuf>,
}

impl FakeTarget {
    /// A live 32-bit fake target whose main module is based at `main_base`.
    pub fn new(main_base: u64) -> Self {
        FakeTarget {
            memory: Mutex::new(BTreeMap::new()),
            main_module: Address::new(main_base),
            modules: Mutex::new(HashMap::new()),
            width: PointerWidth::Four,
            version: Mutex::new(None),
            alive: AtomicBool::new(true),
            deny_io: AtomicBool::new(false),
            unreadable: Mutex::new(Vec::new()),
            window: Mutex::new(None),
            executable: None,
        }
    }

    pub fn with_pointer_width(mut self, width: PointerWidth) -> Self {
        self.width = width;
        self
    }

    pub fn with_module(self, name: impl Into<String>, base: u64) -> Self {
        self.modules
            .lock()
            .unwrap()
            .insert(name.into().to_lowercase(), Address::new(base));
        self
    }

    pub fn with_window(self, window: Arc<FakeWindow>) -> Self {
        *self.window.lock().unwrap() = Some(window);
        self
    }

    pub fn with_executable(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Writes raw bytes into the simulated memory image.
    pub fn load_bytes(&self, address: u64, bytes: &[u8]) {
        let mut memory = self.memory.lock().unwrap();
        for (i, byte) in bytes.iter().enumerate() {
            memory.insert(address + i as u64, *byte);
        }
    }

    /// Plants a pointer-sized little-endian value, as a chain hop would
    /// dereference it.
    pub fn load_pointer(&self, address: u64, value: u64) {
        let bytes = value.to_le_bytes();
        self.load_bytes(address, &bytes[..self.width.byte_len()]);
    }

    /// Reads back raw bytes for assertions; `None` if any byte is unmapped.
    pub fn peek_bytes(&self, address: u64, len: usize) -> Option<Vec<u8>> {
        let memory = self.memory.lock().unwrap();
        (0..len as u64)
            .map(|i| memory.get(&(address + i)).copied())
            .collect()
    }

    /// Simulates the process exiting.
    pub fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn revive(&self) {
        self.alive.store(true, Ordering::SeqCst);
    }

    /// Makes every read and write fail with an access-denied error.
    pub fn deny_io(&self, deny: bool) {
        self.deny_io.store(deny, Ordering::SeqCst);
    }

    /// Marks `[address, address + len)` as unreadable (partial-copy error).
    pub fn poison_range(&self, address: u64, len: u64) {
        self.unreadable.lock().unwrap().push((address, address + len));
    }

    pub fn clear_poison(&self) {
        self.unreadable.lock().unwrap().clear();
    }

    fn check_poison(&self, address: Address, len: usize) -> Result<(), MemoryIoError> {
        let start = address.as_u64();
        let end = start + len as u64;
        let poisoned = self
            .unreadable
            .lock()
            .unwrap()
            .iter()
            .any(|&(lo, hi)| start < hi && end > lo);
        if poisoned {
            Err(MemoryIoError::from_os_code(address, ERROR_PARTIAL_COPY))
        } else {
            Ok(())
        }
    }
}

impl Target for FakeTarget {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn pointer_width(&self) -> PointerWidth {
        self.width
    }

    fn module_base(&self, module: Option<&str>) -> Result<Address, ResolveError> {
        match module {
            None => Ok(self.main_module),
            Some(name) => self
                .modules
                .lock()
                .unwrap()
                .get(&name.to_lowercase())
                .copied()
                .ok_or_else(|| ResolveError::ModuleNotFound(name.to_string())),
        }
    }

    fn read_bytes(&self, address: Address, buf: &mut [u8]) -> Result<usize, MemoryIoError> {
        if self.deny_io.load(Ordering::SeqCst) {
            return Err(MemoryIoError::from_os_code(address, 5));
        }
        self.check_poison(address, buf.len())?;

        let memory = self.memory.lock().unwrap();
        for (i, slot) in buf.iter_mut().enumerate() {
            match memory.get(&(address.as_u64() + i as u64)) {
                Some(byte) => *slot = *byte,
                // Unmapped byte: report how far the copy got.
                None => return Ok(i),
            }
        }
        Ok(buf.len())
    }

    fn write_bytes(&self, address: Address, data: &[u8]) -> Result<usize, MemoryIoError> {
        if self.deny_io.load(Ordering::SeqCst) {
            return Err(MemoryIoError::from_os_code(address, 5));
        }
        self.check_poison(address, data.len())?;

        let mut memory = self.memory.lock().unwrap();
        for (i, byte) in data.iter().enumerate() {
            memory.insert(address.as_u64() + i as u64, *byte);
        }
        Ok(data.len())
    }

    fn version(&self) -> Option<KnownVersion> {
        self.version.lock().unwrap().clone()
    }

    fn set_version(&self, version: KnownVersion) {
        *self.version.lock().unwrap() = Some(version);
    }

    fn executable_path(&self) -> Option<std::path::PathBuf> {
        self.executable.clone()
    }

    fn window(&self) -> Option<Arc<dyn TargetWindow>> {
        self.window
            .lock()
            .unwrap()
            .clone()
            .map(|w| w as Arc<dyn TargetWindow>)
    }
}

/// Recording window: remembers every click and key event it was sent.
pub struct FakeWindow {
    rect: Mutex<ClientRect>,
    clicks: Mutex<Vec<Point>>,
    keys: Mutex<Vec<(u32, bool)>>,
}

impl FakeWindow {
    pub fn new(rect: ClientRect) -> Arc<Self> {
        Arc::new(FakeWindow {
            rect: Mutex::new(rect),
            clicks: Mutex::new(Vec::new()),
            keys: Mutex::new(Vec::new()),
        })
    }

    /// Simulates the user resizing the window.
    pub fn resize(&self, rect: ClientRect) {
        *self.rect.lock().unwrap() = rect;
    }

    pub fn clicks(&self) -> Vec<Point> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<(u32, bool)> {
        self.keys.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.clicks.lock().unwrap().clear();
        self.keys.lock().unwrap().clear();
    }
}

impl TargetWindow for FakeWindow {
    fn client_area(&self) -> SyncResult<ClientRect> {
        Ok(*self.rect.lock().unwrap())
    }

    fn click(&self, point: Point) -> SyncResult<()> {
        self.clicks.lock().unwrap().push(point);
        Ok(())
    }

    fn post_key(&self, virtual_key: u32, pressed: bool) -> SyncResult<()> {
        self.keys.lock().unwrap().push((virtual_key, pressed));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_back_loaded_bytes() {
        let target = FakeTarget::new(0x400000);
        target.load_bytes(0x1000, &[1, 2, 3, 4]);

        let mut buf = [0u8; 4];
        let n = target.read_bytes(Address::new(0x1000), &mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_unmapped_read_is_short() {
        let target = FakeTarget::new(0x400000);
        target.load_bytes(0x1000, &[1, 2]);

        let mut buf = [0u8; 4];
        let n = target.read_bytes(Address::new(0x1000), &mut buf).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn test_denied_io() {
        let target = FakeTarget::new(0x400000);
        target.load_bytes(0x1000, &[1]);
        target.deny_io(true);

        let mut buf = [0u8; 1];
        let err = target.read_bytes(Address::new(0x1000), &mut buf).unwrap_err();
        assert!(err.is_access_denied());

        target.deny_io(false);
        assert!(target.read_bytes(Address::new(0x1000), &mut buf).is_ok());
    }

    #[test]
    fn test_poisoned_range() {
        let target = FakeTarget::new(0x400000);
        target.load_bytes(0x1000, &[0u8; 16]);
        target.poison_range(0x1004, 4);

        let mut buf = [0u8; 4];
        assert!(target.read_bytes(Address::new(0x1000), &mut buf).is_ok());
        let err = target.read_bytes(Address::new(0x1006), &mut buf).unwrap_err();
        assert!(err.is_partial_copy());

        target.clear_poison();
        assert!(target.read_bytes(Address::new(0x1006), &mut buf).is_ok());
    }

    #[test]
    fn test_module_lookup_is_case_insensitive() {
        let target = FakeTarget::new(0x400000).with_module("Engine.dll", 0x7FF00000);
        assert_eq!(
            target.module_base(Some("engine.DLL")).unwrap(),
            Address::new(0x7FF00000)
        );
        assert!(matches!(
            target.module_base(Some("missing.dll")),
            Err(ResolveError::ModuleNotFound(_))
        ));
        assert_eq!(target.module_base(None).unwrap(), Address::new(0x400000));
    }

    #[test]
    fn test_kill_and_revive() {
        let target = FakeTarget::new(0x400000);
        assert!(target.is_alive());
        target.kill();
        assert!(!target.is_alive());
        target.revive();
        assert!(target.is_alive());
    }

    #[test]
    fn test_fake_window_records_events() {
        let window = FakeWindow::new(ClientRect::new(800, 600));
        window.click(Point::new(10, 20)).unwrap();
        window.post_key(0x31, true).unwrap();
        window.post_key(0x31, false).unwrap();

        assert_eq!(window.clicks(), vec![Point::new(10, 20)]);
        assert_eq!(window.keys(), vec![(0x31, true), (0x31, false)]);

        window.resize(ClientRect::new(1024, 768));
        assert_eq!(window.client_area().unwrap(), ClientRect::new(1024, 768));
    }
}
