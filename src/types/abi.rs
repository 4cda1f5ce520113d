//! ABI bindings for the allocation (DDO) and payments contracts.
//!
//! Both interfaces share the rail structs, so they are declared in one `sol!` block.
use alloy::sol;

sol! {
    /// A piece to allocate, as accepted by `createAllocationRequests`.
    #[derive(Debug, PartialEq, Eq)]
    struct PieceInfo {
        bytes pieceCid;
        uint64 size;
        uint64 provider;
        int64 termMin;
        int64 termMax;
        int64 expirationOffset;
        string downloadURL;
        address paymentTokenAddress;
    }

    /// Price configuration of a token accepted by a storage provider.
    #[derive(Debug, PartialEq, Eq, serde::Serialize)]
    struct TokenConfig {
        address token;
        uint256 pricePerBytePerEpoch;
        bool isActive;
    }

    /// A verified registry claim.
    #[derive(Debug, PartialEq, Eq, serde::Serialize)]
    struct Claim {
        uint64 provider;
        uint64 client;
        bytes data;
        uint64 size;
        int64 term_min;
        int64 term_max;
        int64 term_start;
        uint64 sector;
    }

    /// A payment rail as stored by the payments contract.
    #[derive(Debug, PartialEq, Eq)]
    struct RailView {
        address token;
        address from;
        address to;
        address operator;
        address validator;
        uint256 paymentRate;
        uint256 lockupPeriod;
        uint256 lockupFixed;
        uint256 settledUpTo;
        uint256 endEpoch;
        uint256 commissionRateBps;
        address serviceFeeRecipient;
    }

    /// Summary of a rail in payer/payee listings.
    #[derive(Debug, PartialEq, Eq)]
    struct RailInfo {
        uint256 railId;
        bool isTerminated;
        uint256 endEpoch;
    }

    #[sol(rpc)]
    #[derive(Debug)]
    interface IDDO {
        function createAllocationRequests(PieceInfo[] calldata pieceInfos) external returns (bytes memory recipientData);

        function calculateStorageCost(uint64 actorId, address token, uint64 pieceSize, int64 termLength) external view returns (uint256 totalCost);
        function getAndValidateSPPrice(uint64 actorId, address token) external view returns (uint256 pricePerBytePerEpoch);
        function getSPActivePricePerBytePerEpoch(uint64 actorId, address token) external view returns (uint256 pricePerBytePerEpoch);
        function getSPSupportedTokens(uint64 actorId) external view returns (TokenConfig[] memory tokenConfigs);
        function getSPBasicInfo(uint64 actorId) external view returns (address paymentAddress, bool isActive, uint256 supportedTokenCount, uint64 minPieceSize, uint64 maxPieceSize);
        function spConfigs(uint64 actorId) external view returns (address paymentAddress, uint64 minPieceSize, uint64 maxPieceSize, int64 minTermLength, int64 maxTermLength, bool isActive);
        function isSPActive(uint64 actorId) external view returns (bool);

        function getAllocationIdsForClient(address clientAddress) external view returns (uint64[] memory allocationIds);
        function getAllocationIdsForProvider(uint64 providerId) external view returns (uint64[] memory allocationIds);
        function allocationIdToProvider(uint64 allocationId) external view returns (uint64);
        function allocationIdToRailId(uint64 allocationId) external view returns (uint256);
        function getAllocationRailInfo(uint64 allocationId) external view returns (uint256 railId, uint64 providerId, RailView memory railView);
        function getClaimInfoForClient(address clientAddress, uint64 claimId) external view returns (Claim[] memory claims);

        function paymentsContract() external view returns (address);
        function EPOCHS_PER_MONTH() external view returns (uint256);

        function registerSP(uint64 actorId, address paymentAddress, uint64 minPieceSize, uint64 maxPieceSize, int64 minTermLength, int64 maxTermLength, TokenConfig[] calldata tokenConfigs) external;
        function updateSPConfig(uint64 actorId, address paymentAddress, uint64 minPieceSize, uint64 maxPieceSize, int64 minTermLength, int64 maxTermLength) external;
        function addSPToken(uint64 actorId, address token, uint256 pricePerBytePerEpoch) external;
        function updateSPToken(uint64 actorId, address token, uint256 pricePerBytePerEpoch, bool isActive) external;

        function settleSpPayment(uint64 allocationId, uint256 untilEpoch) external returns (uint256 totalSettledAmount, uint256 totalNetPayeeAmount, uint256 totalPaymentFee, uint256 totalOperatorCommission, uint256 finalSettledEpoch, string memory note);
        function settleSpTotalPayment(uint64 providerId, uint256 untilEpoch) external;

        error AllocationNotFound();
        error InvalidAllocationRequest();
        error InvalidClaimIdForClient();
        error InvalidPieceSize();
        error InvalidProvider();
        error InvalidSPConfig();
        error NoAllocationsFoundForProvider();
        error NoClaimsFound();
        error NoPieceInfosProvided();
        error NoRailFoundForAllocation();
        error NotEnoughBalance(uint256 balance, uint256 value);
        error OwnableUnauthorizedAccount(address account);
        error PaymentsContractNotSet();
        error PieceSizeOutOfRange();
        error RailCreationFailed();
        error SPAlreadyRegistered();
        error SPNotActive();
        error SPNotRegistered();
        error TermLengthOutOfRange();
        error TokenAlreadyExists();
        error TokenInactive();
        error TokenNotFound();
        error TokenNotSupportedBySP();
    }

    #[sol(rpc)]
    #[derive(Debug)]
    interface IPayments {
        function accounts(address token, address owner) external view returns (uint256 funds, uint256 lockupCurrent, uint256 lockupRate, uint256 lockupLastSettledAt);
        function operatorApprovals(address token, address client, address operator) external view returns (bool isApproved, uint256 rateAllowance, uint256 lockupAllowance, uint256 rateUsage, uint256 lockupUsage, uint256 maxLockupPeriod);
        function getAccountInfoIfSettled(address token, address owner) external view returns (uint256 fundedUntilEpoch, uint256 currentFunds, uint256 availableFunds, uint256 currentLockupRate);

        function getRail(uint256 railId) external view returns (RailView memory);
        function getRailsForPayerAndToken(address payer, address token) external view returns (RailInfo[] memory);
        function getRailsForPayeeAndToken(address payee, address token) external view returns (RailInfo[] memory);

        function accumulatedFees(address token) external view returns (uint256);
        function hasCollectedFees(address token) external view returns (bool);
        function getAllAccumulatedFees() external view returns (address[] memory tokens, uint256[] memory amounts, uint256 count);
        function COMMISSION_MAX_BPS() external view returns (uint256);
        function PAYMENT_FEE_BPS() external view returns (uint256);

        function deposit(address token, address to, uint256 amount) external payable;
        function withdraw(address token, uint256 amount) external;
        function withdrawTo(address token, address to, uint256 amount) external;
        function setOperatorApproval(address token, address operator, bool approved, uint256 rateAllowance, uint256 lockupAllowance, uint256 maxLockupPeriod) external;
        function settleRail(uint256 railId, uint256 untilEpoch) external returns (uint256 totalSettledAmount, uint256 totalNetPayeeAmount, uint256 totalPaymentFee, uint256 totalOperatorCommission, uint256 finalSettledEpoch, string memory note);

        error OwnableUnauthorizedAccount(address account);
        error ReentrancyGuardReentrantCall();
        error SafeERC20FailedOperation(address token);
    }
}
