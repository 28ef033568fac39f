use crate::model::comparison_mode::HashType;
use crate::model::error::io::IOError;
use blake2::{Blake2b512, Blake2s256};
use digest::Digest;
use md5::Md5;
use sha2::Sha256;
use sha3::Sha3_256;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUFFER_SIZE: usize = 65536;

pub fn hash_file(path: &Path, hash_type: HashType) -> Result<Vec<u8>, IOError> {
    let file = File::open(path).map_err(|err| read_failed(path, err))?;
    match hash_type {
        HashType::Md5 => digest_hash::<Md5>(path, file),
        HashType::Sha256 => digest_hash::<Sha256>(path, file),
        HashType::Sha3 => digest_hash::<Sha3_256>(path, file),
        HashType::Blake2b => digest_hash::<Blake2b512>(path, file),
        HashType::Blake2s => digest_hash::<Blake2s256>(path, file),
        HashType::Blake3 => blake3_hash(path, file),
    }
}

fn digest_hash<D: Digest>(path: &Path, mut file: File) -> Result<Vec<u8>, IOError> {
    let mut hasher = D::new();
    let mut buffer = vec![0; BUFFER_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(|err| read_failed(path, err))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hasher.finalize().to_vec())
}

fn blake3_hash(path: &Path, mut file: File) -> Result<Vec<u8>, IOError> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0; BUFFER_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(|err| read_failed(path, err))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hasher.finalize().as_bytes().to_vec())
}

fn read_failed(path: &Path, err: std::io::Error) -> IOError {
    IOError::ReadFileFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
