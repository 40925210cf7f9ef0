//! BLE UART adapter.
//!
//! Implements [`LinkTransport`] over the Nordic UART Service, the de facto
//! "serial over BLE" profile understood by most terminal apps.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `BtDriver` brings the controller up, then a
//!   raw Bluedroid GATT server exposes the service.
//! - **all other targets**: simulation with scriptable connect/drop for
//!   host-side tests.
//!
//! ## GATT Service Layout
//!
//! | Characteristic | UUID                              | Perms        |
//! |----------------|-----------------------------------|--------------|
//! | RX             | `6e400002-…-e50e24dcca9e`         | Write        |
//! | TX             | `6e400003-…-e50e24dcca9e`         | Notify       |
//!
//! Writes to RX are accepted and discarded.  Each outbound line is one TX
//! notification.
//!
//! ## Link state
//!
//! The adapter never restarts advertising on its own.  After a disconnect
//! it reports "not advertising" and the
//! [`LinkManager`](crate::app::link::LinkManager) decides when to re-arm.

use log::{debug, info, warn};

use crate::app::ports::LinkTransport;
use crate::config::DeviceName;
use crate::error::{Error, LinkError};

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

pub const SERVICE_UUID: u128 = 0x6e400001_b5a3_f393_e0a9_e50e24dcca9e;
pub const CHAR_RX: u128 = 0x6e400002_b5a3_f393_e0a9_e50e24dcca9e;
pub const CHAR_TX: u128 = 0x6e400003_b5a3_f393_e0a9_e50e24dcca9e;

/// Notification payload limit at the default ATT MTU (23 − 3).
pub const MAX_NOTIFY_LEN: usize = 20;

const ADV_MAX_LEN: usize = 31;
const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_NAME_COMPLETE: u8 = 0x09;
const AD_TYPE_UUID128_COMPLETE: u8 = 0x07;
/// LE General Discoverable, BR/EDR not supported.
const AD_FLAGS: u8 = 0x06;

// ───────────────────────────────────────────────────────────────
// Advertising payloads
// ───────────────────────────────────────────────────────────────

/// Advertising data: flags plus the complete local name.
///
/// A name that does not fit is cut at a UTF-8 boundary.
pub fn adv_payload(name: &str) -> heapless::Vec<u8, ADV_MAX_LEN> {
    let mut out = heapless::Vec::new();
    let _ = out.extend_from_slice(&[2, AD_TYPE_FLAGS, AD_FLAGS]);

    let room = ADV_MAX_LEN - out.len() - 2;
    let mut end = name.len().min(room);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    let name = &name.as_bytes()[..end];
    if !name.is_empty() {
        let _ = out.push(name.len() as u8 + 1);
        let _ = out.push(AD_TYPE_NAME_COMPLETE);
        let _ = out.extend_from_slice(name);
    }
    out
}

/// Scan response: the service UUID, little-endian as on air.
pub fn scan_rsp_payload() -> [u8; 18] {
    let mut out = [0u8; 18];
    out[0] = 17;
    out[1] = AD_TYPE_UUID128_COMPLETE;
    out[2..].copy_from_slice(&SERVICE_UUID.to_le_bytes());
    out
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF (Bluedroid)
// ───────────────────────────────────────────────────────────────

// Bluedroid callbacks are C function pointers that cannot capture Rust
// closures.  These atomics bridge the callback context to the adapter.

#[cfg(target_os = "espidf")]
mod stack {
    use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    use esp_idf_svc::sys::*;

    use super::{CHAR_RX, CHAR_TX, SERVICE_UUID};

    pub(super) static GATTS_IF: AtomicU32 = AtomicU32::new(ESP_GATT_IF_NONE);
    pub(super) static CONN_ID: AtomicU32 = AtomicU32::new(0);
    pub(super) static TX_HANDLE: AtomicU32 = AtomicU32::new(0);
    pub(super) static CONNECTED: AtomicBool = AtomicBool::new(false);
    pub(super) static ADVERTISING: AtomicBool = AtomicBool::new(false);
    /// Start requested, completion not yet reported.
    pub(super) static ADV_PENDING: AtomicBool = AtomicBool::new(false);

    static SVC_HANDLE: AtomicU32 = AtomicU32::new(0);
    static RX_HANDLE: AtomicU32 = AtomicU32::new(0);
    static CHAR_STEP: AtomicU32 = AtomicU32::new(0);

    const NUM_HANDLES: u16 = 8;
    const CCCD_UUID: u16 = 0x2902;

    fn uuid128(uuid: u128) -> esp_bt_uuid_t {
        let mut t: esp_bt_uuid_t = unsafe { core::mem::zeroed() };
        t.len = 16;
        t.uuid.uuid128 = uuid.to_le_bytes();
        t
    }

    fn uuid16(uuid: u16) -> esp_bt_uuid_t {
        let mut t: esp_bt_uuid_t = unsafe { core::mem::zeroed() };
        t.len = 2;
        t.uuid.uuid16 = uuid;
        t
    }

    pub(super) fn adv_params() -> esp_ble_adv_params_t {
        esp_ble_adv_params_t {
            adv_int_min: 0x20,
            adv_int_max: 0x40,
            adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
            own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
            channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
            adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
            ..unsafe { core::mem::zeroed() }
        }
    }

    unsafe fn add_char(svc_handle: u16, uuid: u128, perm: u32, prop: u32) {
        let mut char_uuid = uuid128(uuid);
        let mut initial = [0u8; 1];
        let mut value = esp_attr_value_t {
            attr_max_len: super::MAX_NOTIFY_LEN as u16,
            attr_len: initial.len() as u16,
            attr_value: initial.as_mut_ptr(),
        };
        let mut control = esp_attr_control_t {
            auto_rsp: ESP_GATT_AUTO_RSP as u8,
        };
        let ret = unsafe {
            esp_ble_gatts_add_char(
                svc_handle,
                &mut char_uuid,
                perm as esp_gatt_perm_t,
                prop as esp_gatt_char_prop_t,
                &mut value,
                &mut control,
            )
        };
        if ret != ESP_OK as i32 {
            log::error!("BLE GATTS: add_char failed ({})", ret);
        }
    }

    pub(super) unsafe extern "C" fn gap_event_handler(
        event: esp_gap_ble_cb_event_t,
        param: *mut esp_ble_gap_cb_param_t,
    ) {
        match event {
            esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_DATA_RAW_SET_COMPLETE_EVT => {
                log::debug!("BLE GAP: advertising data set");
            }
            esp_gap_ble_cb_event_t_ESP_GAP_BLE_SCAN_RSP_DATA_RAW_SET_COMPLETE_EVT => {
                log::debug!("BLE GAP: scan response set");
            }
            esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
                let status = unsafe { (*param).adv_start_cmpl.status };
                let ok = status == esp_bt_status_t_ESP_BT_STATUS_SUCCESS;
                ADVERTISING.store(ok, Ordering::Release);
                ADV_PENDING.store(false, Ordering::Release);
                if ok {
                    log::info!("BLE GAP: advertising started");
                } else {
                    log::debug!("BLE GAP: advertising start refused (status={})", status);
                }
            }
            esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
                ADVERTISING.store(false, Ordering::Release);
                log::info!("BLE GAP: advertising stopped");
            }
            _ => {}
        }
    }

    pub(super) unsafe extern "C" fn gatts_event_handler(
        event: esp_gatts_cb_event_t,
        gatts_if: esp_gatt_if_t,
        param: *mut esp_ble_gatts_cb_param_t,
    ) {
        match event {
            esp_gatts_cb_event_t_ESP_GATTS_REG_EVT => {
                GATTS_IF.store(gatts_if as u32, Ordering::Release);
                log::info!("BLE GATTS: app registered (if={})", gatts_if);
                let mut svc_id = esp_gatt_srvc_id_t {
                    id: esp_gatt_id_t {
                        uuid: uuid128(SERVICE_UUID),
                        inst_id: 0,
                    },
                    is_primary: true,
                };
                unsafe { esp_ble_gatts_create_service(gatts_if, &mut svc_id, NUM_HANDLES) };
            }
            esp_gatts_cb_event_t_ESP_GATTS_CREATE_EVT => {
                let svc_handle = unsafe { (*param).create.service_handle };
                SVC_HANDLE.store(svc_handle as u32, Ordering::Relaxed);
                log::info!("BLE GATTS: service created (handle={})", svc_handle);
                unsafe { esp_ble_gatts_start_service(svc_handle) };
                CHAR_STEP.store(1, Ordering::Relaxed);
                unsafe {
                    add_char(
                        svc_handle,
                        CHAR_RX,
                        ESP_GATT_PERM_WRITE,
                        ESP_GATT_CHAR_PROP_BIT_WRITE | ESP_GATT_CHAR_PROP_BIT_WRITE_NR,
                    )
                };
            }
            esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_EVT => {
                let handle = unsafe { (*param).add_char.attr_handle };
                let svc_handle = SVC_HANDLE.load(Ordering::Relaxed) as u16;
                match CHAR_STEP.load(Ordering::Relaxed) {
                    1 => {
                        RX_HANDLE.store(handle as u32, Ordering::Relaxed);
                        log::debug!("BLE GATTS: RX char (handle={})", handle);
                        CHAR_STEP.store(2, Ordering::Relaxed);
                        unsafe {
                            add_char(
                                svc_handle,
                                CHAR_TX,
                                ESP_GATT_PERM_READ,
                                ESP_GATT_CHAR_PROP_BIT_NOTIFY,
                            )
                        };
                    }
                    2 => {
                        TX_HANDLE.store(handle as u32, Ordering::Release);
                        log::debug!("BLE GATTS: TX char (handle={})", handle);
                        CHAR_STEP.store(3, Ordering::Relaxed);
                        let mut cccd = uuid16(CCCD_UUID);
                        let ret = unsafe {
                            esp_ble_gatts_add_char_descr(
                                svc_handle,
                                &mut cccd,
                                (ESP_GATT_PERM_READ | ESP_GATT_PERM_WRITE) as esp_gatt_perm_t,
                                core::ptr::null_mut(),
                                core::ptr::null_mut(),
                            )
                        };
                        if ret != ESP_OK as i32 {
                            log::error!("BLE GATTS: add CCCD failed ({})", ret);
                        }
                    }
                    _ => {}
                }
            }
            esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_DESCR_EVT => {
                log::info!("BLE GATTS: UART service ready");
            }
            esp_gatts_cb_event_t_ESP_GATTS_CONNECT_EVT => {
                let conn_id = unsafe { (*param).connect.conn_id };
                CONN_ID.store(conn_id as u32, Ordering::Release);
                CONNECTED.store(true, Ordering::Release);
                // The controller stops advertising once a central attaches.
                ADVERTISING.store(false, Ordering::Release);
                ADV_PENDING.store(false, Ordering::Release);
                log::info!("BLE GATTS: client connected (conn_id={})", conn_id);
            }
            esp_gatts_cb_event_t_ESP_GATTS_DISCONNECT_EVT => {
                CONNECTED.store(false, Ordering::Release);
                ADVERTISING.store(false, Ordering::Release);
                log::info!("BLE GATTS: client disconnected");
            }
            esp_gatts_cb_event_t_ESP_GATTS_WRITE_EVT => {
                let p = unsafe { &(*param).write };
                if p.handle as u32 == RX_HANDLE.load(Ordering::Relaxed) {
                    log::debug!("BLE GATTS: ignoring {} byte(s) on RX", p.len);
                }
            }
            _ => {}
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

pub struct BleUart {
    device_name: DeviceName,
    #[cfg(target_os = "espidf")]
    _driver: esp_idf_svc::bt::BtDriver<'static, esp_idf_svc::bt::Ble>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimState,
}

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
struct SimState {
    advertising: bool,
    connected: bool,
    advertise_calls: u32,
    refuse_advertising: bool,
    fail_writes: bool,
    sent: Vec<String>,
}

#[cfg(target_os = "espidf")]
impl BleUart {
    /// Bring the BLE stack up and register the UART service.
    ///
    /// Does not advertise; call
    /// [`start_advertising`](LinkTransport::start_advertising) for that.
    pub fn init(
        modem: esp_idf_svc::hal::modem::Modem,
        device_name: &DeviceName,
    ) -> Result<Self, Error> {
        use esp_idf_svc::bt::{Ble, BtDriver};
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use esp_idf_svc::sys::*;

        let check = |ret: esp_err_t| {
            if ret == ESP_OK as i32 {
                Ok(())
            } else {
                Err(Error::TransportUnavailable(ret))
            }
        };

        let nvs = EspDefaultNvsPartition::take().ok();
        let driver = BtDriver::<Ble>::new(modem, nvs)
            .map_err(|e| Error::TransportUnavailable(e.code()))?;

        unsafe {
            if esp_bluedroid_get_status() != esp_bluedroid_status_t_ESP_BLUEDROID_STATUS_ENABLED {
                check(esp_bluedroid_init())?;
                check(esp_bluedroid_enable())?;
            }

            check(esp_ble_gap_register_callback(Some(stack::gap_event_handler)))?;
            check(esp_ble_gatts_register_callback(Some(stack::gatts_event_handler)))?;
            check(esp_ble_gatts_app_register(0))?;

            let mut cname: heapless::Vec<u8, { crate::config::MAX_DEVICE_NAME_LEN + 1 }> =
                heapless::Vec::new();
            let _ = cname.extend_from_slice(device_name.as_bytes());
            let _ = cname.push(0);
            check(esp_ble_gap_set_device_name(cname.as_ptr() as *const _))?;

            let mut adv = adv_payload(device_name);
            check(esp_ble_gap_config_adv_data_raw(adv.as_mut_ptr(), adv.len() as u32))?;
            let mut rsp = scan_rsp_payload();
            check(esp_ble_gap_config_scan_rsp_data_raw(rsp.as_mut_ptr(), rsp.len() as u32))?;
        }

        info!("BLE(espidf): UART service registering as '{}'", device_name);
        Ok(Self {
            device_name: device_name.clone(),
            _driver: driver,
        })
    }

    fn platform_start_advertising(&mut self) -> Result<(), LinkError> {
        use core::sync::atomic::Ordering;
        use esp_idf_svc::sys::*;

        let mut params = stack::adv_params();
        let ret = unsafe { esp_ble_gap_start_advertising(&mut params) };
        if ret != ESP_OK as i32 {
            return Err(LinkError::AdvertiseFailed(ret));
        }
        stack::ADV_PENDING.store(true, Ordering::Release);
        Ok(())
    }

    fn platform_is_advertising(&self) -> bool {
        use core::sync::atomic::Ordering;
        stack::ADVERTISING.load(Ordering::Acquire) || stack::ADV_PENDING.load(Ordering::Acquire)
    }

    fn platform_is_connected(&self) -> bool {
        stack::CONNECTED.load(core::sync::atomic::Ordering::Acquire)
    }

    fn platform_write(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        use core::sync::atomic::Ordering;
        use esp_idf_svc::sys::*;

        let gatts_if = stack::GATTS_IF.load(Ordering::Acquire);
        let handle = stack::TX_HANDLE.load(Ordering::Acquire);
        if gatts_if == ESP_GATT_IF_NONE || handle == 0 {
            return Err(LinkError::WriteFailed(ESP_ERR_INVALID_STATE as i32));
        }

        let mut buf = [0u8; MAX_NOTIFY_LEN];
        buf[..frame.len()].copy_from_slice(frame);
        let ret = unsafe {
            esp_ble_gatts_send_indicate(
                gatts_if as esp_gatt_if_t,
                stack::CONN_ID.load(Ordering::Acquire) as u16,
                handle as u16,
                frame.len() as u16,
                buf.as_mut_ptr(),
                false,
            )
        };
        if ret != ESP_OK as i32 {
            return Err(LinkError::WriteFailed(ret));
        }
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl BleUart {
    #[allow(clippy::unnecessary_wraps)]
    pub fn init(device_name: &DeviceName) -> Result<Self, Error> {
        info!(
            "BLE(sim): UART service '{}' ({:032x})",
            device_name, SERVICE_UUID
        );
        Ok(Self {
            device_name: device_name.clone(),
            sim: SimState::default(),
        })
    }

    fn platform_start_advertising(&mut self) -> Result<(), LinkError> {
        self.sim.advertise_calls += 1;
        if self.sim.refuse_advertising {
            return Err(LinkError::AdvertiseFailed(-1));
        }
        self.sim.advertising = true;
        debug!("BLE(sim): advertising");
        Ok(())
    }

    fn platform_is_advertising(&self) -> bool {
        self.sim.advertising
    }

    fn platform_is_connected(&self) -> bool {
        self.sim.connected
    }

    fn platform_write(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        if self.sim.fail_writes {
            return Err(LinkError::WriteFailed(-1));
        }
        self.sim
            .sent
            .push(String::from_utf8_lossy(frame).into_owned());
        Ok(())
    }

    // ── Simulation controls ───────────────────────────────────

    /// A central attaches; the controller stops advertising.
    pub fn sim_connect(&mut self) {
        self.sim.connected = true;
        self.sim.advertising = false;
    }

    /// The central goes away.  Advertising is not resumed.
    pub fn sim_disconnect(&mut self) {
        self.sim.connected = false;
        self.sim.advertising = false;
    }

    /// Advertising stops without a connection (e.g. controller timeout).
    pub fn sim_drop_advertising(&mut self) {
        self.sim.advertising = false;
    }

    pub fn sim_refuse_advertising(&mut self, refuse: bool) {
        self.sim.refuse_advertising = refuse;
    }

    pub fn sim_fail_writes(&mut self, fail: bool) {
        self.sim.fail_writes = fail;
    }

    pub fn sim_advertise_calls(&self) -> u32 {
        self.sim.advertise_calls
    }

    /// Lines delivered to the peer, newline included.
    pub fn sim_sent(&self) -> &[String] {
        &self.sim.sent
    }
}

// ───────────────────────────────────────────────────────────────
// LinkTransport implementation
// ───────────────────────────────────────────────────────────────

impl LinkTransport for BleUart {
    fn start_advertising(&mut self) -> Result<(), LinkError> {
        debug!("BLE: advertising as '{}'", self.device_name);
        self.platform_start_advertising()
    }

    fn is_advertising(&self) -> bool {
        self.platform_is_advertising()
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn write(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        if frame.len() > MAX_NOTIFY_LEN {
            warn!("BLE: {} byte frame exceeds notify limit", frame.len());
            return Err(LinkError::LineTooLong);
        }
        self.platform_write(frame)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
