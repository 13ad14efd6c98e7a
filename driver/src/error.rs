use kernel::KernelError;

/// Maps a backend error into the kernel's error vocabulary.
pub trait ConvertError: 'static + Sized {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
