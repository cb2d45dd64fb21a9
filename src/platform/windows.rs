use super::FileId;
use std::fs::Metadata;
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::fs::MetadataExt;
use std::path::Path;
use std::ptr;
use winapi::um::fileapi::{
    CreateFileW, GetFileInformationByHandle, BY_HANDLE_FILE_INFORMATION, OPEN_EXISTING,
};
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
use winapi::um::winbase::FILE_FLAG_BACKUP_SEMANTICS;
use winapi::um::winnt::{
    FILE_ATTRIBUTE_REPARSE_POINT, FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE,
};

/// Volume serial number and file index of `path`. Works for directories too
/// (`FILE_FLAG_BACKUP_SEMANTICS`).
pub fn file_id(path: &Path) -> io::Result<FileId> {
    let path_wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    unsafe {
        let handle = CreateFileW(
            path_wide.as_ptr(),
            0,
            FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE,
            ptr::null_mut(),
            OPEN_EXISTING,
            FILE_FLAG_BACKUP_SEMANTICS,
            ptr::null_mut(),
        );
        if handle == INVALID_HANDLE_VALUE {
            return Err(io::Error::last_os_error());
        }

        let mut file_info: BY_HANDLE_FILE_INFORMATION = std::mem::zeroed();
        let result = GetFileInformationByHandle(handle, &mut file_info);
        let info_error = if result == 0 {
            Some(io::Error::last_os_error())
        } else {
            None
        };
        CloseHandle(handle);
        if let Some(err) = info_error {
            return Err(err);
        }

        let file_index =
            ((file_info.nFileIndexHigh as u64) << 32) | file_info.nFileIndexLow as u64;
        Ok(FileId::new(file_info.dwVolumeSerialNumber as u64, file_index))
    }
}

pub fn is_reparse_point(metadata: &Metadata) -> bool {
    metadata.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0
}
